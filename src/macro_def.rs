//! defines macro
//!
//! # getter!
//! getter that return a reference
//! ## Examples
//! ```ignore
//! struct a {b: Vec<usize>}
//! impl a {
//!     getter!(pub, b, Vec<usize>);
//! }
//! ```
//! ```ignore
//! struct a {b: Vec<usize>}
//! impl a {
//!     getter!(pub const, b, Vec<usize>);
//! }
//! ```
//! # getter_copy!
//! create a getter that copy the value.
//! ## Examples
//! ```ignore
//! struct a {b: usize}
//! impl a {
//!     getter_copy!(pub const, b, usize);
//! }
//! ```

macro_rules! getter {
    ($(#[$meta:meta])* pub, $i:ident, $t:ty) => {
        $(#[$meta])*
        pub fn $i(&self) -> &$t {
            &self.$i
        }
    };
    ($(#[$meta:meta])* pub const, $i:ident, $t:ty) => {
        $(#[$meta])*
        pub const fn $i(&self) -> &$t {
            &self.$i
        }
    };
}

macro_rules! getter_copy {
    ($(#[$meta:meta])* pub, $i:ident, $t:ty) => {
        $(#[$meta])*
        pub fn $i(&self) -> $t {
            self.$i
        }
    };
    ($(#[$meta:meta])* pub const, $i:ident, $t:ty) => {
        $(#[$meta])*
        pub const fn $i(&self) -> $t {
            self.$i
        }
    };
}
