use indexmap::IndexMap;

use crate::interpreter::{scope::Context, value::Value};

/// An object created by an `encap` or `sencap` literal.
///
/// Fields keep the order in which the body bound them. Inherited members are
/// stored separately so that `prev` lookups and merges can tell them apart,
/// but both are visible through [`EncapObject::members`].
#[derive(Debug, Clone)]
pub struct EncapObject {
    /// The bindings made by the object's own body.
    pub fields:    IndexMap<String, Value>,
    /// The members of the object it inherits from.
    pub inherited: IndexMap<String, Value>,
    /// Type names, from the oldest ancestor to the object's own.
    pub types:     Vec<String>,
    /// The context `=>` evaluates in; its table holds the members.
    pub scope:     Context,
}

impl EncapObject {
    /// Returns every member, own fields shadowing inherited ones.
    #[must_use]
    pub fn members(&self) -> IndexMap<String, Value> {
        let mut members = self.inherited.clone();
        for (name, value) in &self.fields {
            members.insert(name.clone(), value.clone());
        }
        members
    }

    /// Looks up a member by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).or_else(|| self.inherited.get(name))
    }

    /// The most specific type name, if the object was given one.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.types.last().map(String::as_str)
    }
}
