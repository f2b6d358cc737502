//! Standard operator table
//!
//! | precedence | operators            |
//! |------------|----------------------|
//! | 1          | `or`                 |
//! | 2          | `and`                |
//! | 3          | `==` `!=`            |
//! | 4          | `<` `>` `<=` `>=`    |
//! | 5          | `+` `-`              |
//! | 6          | `*` `/` `%`          |
//! | 7          | `^`                  |
//!
//! Unary: `!` and `-`.

pub mod arithmetic;
pub mod comparison;
pub mod logical;

use crate::registry::Registry;

/// Register all standard operators
pub fn register_standard_operators(registry: &mut Registry) {
    arithmetic::register_arithmetic_operators(registry);
    comparison::register_comparison_operators(registry);
    logical::register_logical_operators(registry);
}
