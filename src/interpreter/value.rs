/// The `Value` type.
///
/// Defines the runtime value every evaluation produces: its variants, the
/// span and context stamped on it, truthiness, re-homing into a scope and the
/// textual rendering shown to users.
pub mod core;
/// Function values.
///
/// Defines the shared, identity bearing function object. Functions hoisted by
/// the declarator start out uninitialized and are completed in place when
/// their definition runs, so every holder of the handle sees the change.
pub mod function;
/// Encapsulation objects.
///
/// Defines the object produced by `encap` and `sencap` literals: its own and
/// inherited fields, its type tags and the internal context used for field
/// and method access.
pub mod encap;

pub use self::{
    core::{List, Value, ValueKind},
    encap::EncapObject,
    function::{Function, FunctionData},
};
