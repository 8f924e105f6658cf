//! # Callable Layer (Invoke)
//!
//! The single capability shared by plain functions and dispatch points: take
//! the arguments, return the output. Multiple arguments are passed as a
//! tuple, and a receiver (the "self" of a method) is passed as an explicit
//! first tuple element.

/// Something that can be called with `Args`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be invoked with `{Args}`",
    label = "missing `Invoke<{Args}>` implementation",
    note = "Closures `Fn({Args}) -> Out` implement `Invoke` automatically."
)]
pub trait Invoke<Args>: Send + Sync {
    /// The value produced by a call.
    type Output;

    /// Call with `args`.
    fn invoke(&self, args: Args) -> Self::Output;
}

// Blanket impl for closures
impl<F, Args, Out> Invoke<Args> for F
where
    F: Fn(Args) -> Out + Send + Sync,
{
    type Output = Out;

    fn invoke(&self, args: Args) -> Self::Output {
        (self)(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_twice<I: Invoke<(i32, i32), Output = i32>>(f: &I) -> i32 {
        f.invoke((1, 2)) + f.invoke((3, 4))
    }

    #[test]
    fn test_closure_invoke() {
        let add = |(a, b): (i32, i32)| a + b;
        assert_eq!(call_twice(&add), 10);
    }
}
