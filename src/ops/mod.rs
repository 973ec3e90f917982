//! Engine operations on canonical expressions

mod diff;
mod evalf;
mod expand;
mod ntheory;
mod solve;
mod subs;

pub use diff::diff;
pub use evalf::{evalf, format_float};
pub use expand::expand;
pub use ntheory::{factorial, fibonacci, gcd, lcm};
pub use solve::{SolutionSet, solve_poly};
pub use subs::subs;
