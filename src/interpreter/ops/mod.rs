pub mod arith;
pub mod motion;
pub mod select;

// Handlers are `impl Interpreter` blocks; only the `add` kernel is public.
