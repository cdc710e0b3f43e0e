// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime classes and the [`Object`] trait.
//!
//! `Ref` kinds check an instance's class by identity: a [`ClassInfo`] is a
//! `static` descriptor and two classes are the same only if they are the same
//! `static`. Subclassing is expressed through the `parent` link.

use alloc::rc::Rc;
use core::fmt;

use crate::model::{Expression, Transform};
use crate::object::HasProps;

/// Static description of a runtime class.
///
/// Always declare classes as `static` items; identity is the address.
///
/// ```rust
/// use glyphspec_property::{ClassInfo, HAS_PROPS};
///
/// static GLYPH: ClassInfo = ClassInfo::extends("Glyph", &HAS_PROPS);
/// static CIRCLE: ClassInfo = ClassInfo::extends("Circle", &GLYPH);
/// static BIT_SET: ClassInfo = ClassInfo::new("BitSet");
///
/// assert!(CIRCLE.is_subclass_of(&GLYPH));
/// assert!(CIRCLE.is_subclass_of(&HAS_PROPS));
/// assert!(!GLYPH.is_subclass_of(&CIRCLE));
/// assert!(!BIT_SET.is_subclass_of(&HAS_PROPS));
/// ```
pub struct ClassInfo {
    name: &'static str,
    parent: Option<&'static ClassInfo>,
}

impl ClassInfo {
    /// A root class.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name, parent: None }
    }

    /// A class deriving from `parent`.
    #[must_use]
    pub const fn extends(name: &'static str, parent: &'static Self) -> Self {
        Self {
            name,
            parent: Some(parent),
        }
    }

    /// Class name.
    #[must_use]
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Direct parent class.
    #[must_use]
    #[inline]
    pub const fn parent(&self) -> Option<&'static Self> {
        self.parent
    }

    /// Returns `true` if `self` is `other` or derives from it.
    #[must_use]
    pub fn is_subclass_of(&self, other: &Self) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if core::ptr::eq(class, other) {
                return true;
            }
            current = class.parent;
        }
        false
    }

    /// Returns `true` for classes in the `HasProps` hierarchy.
    #[must_use]
    pub fn is_model(&self) -> bool {
        self.is_subclass_of(&HAS_PROPS)
    }
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassInfo").field(&self.name).finish()
    }
}

/// Root of every property-bearing class.
pub static HAS_PROPS: ClassInfo = ClassInfo::new("HasProps");

/// Base of document models.
pub static MODEL: ClassInfo = ClassInfo::extends("Model", &HAS_PROPS);

/// Base class of [`Expression`] implementations.
pub static EXPRESSION: ClassInfo = ClassInfo::extends("Expression", &MODEL);

/// Base class of [`Transform`] implementations.
pub static TRANSFORM: ClassInfo = ClassInfo::extends("Transform", &MODEL);

/// An instance that can be referenced from a [`Value::Instance`].
///
/// The capability hooks let spec resolution and reference collection
/// recover the richer interfaces from a plain object reference.
///
/// [`Value::Instance`]: crate::Value::Instance
pub trait Object: fmt::Debug + 'static {
    /// Runtime class of the instance.
    fn class(&self) -> &'static ClassInfo;

    /// Returns the instance as an expression, if it is one.
    fn into_expression(self: Rc<Self>) -> Option<Rc<dyn Expression>> {
        None
    }

    /// Returns the instance as a transform, if it is one.
    fn into_transform(self: Rc<Self>) -> Option<Rc<dyn Transform>> {
        None
    }

    /// Returns the instance's properties, if it has any.
    fn as_has_props(&self) -> Option<&HasProps> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    static BIT_SET: ClassInfo = ClassInfo::new("BitSet");
    static GLYPH: ClassInfo = ClassInfo::extends("Glyph", &MODEL);

    #[test]
    fn identity_not_name() {
        static OTHER_GLYPH: ClassInfo = ClassInfo::extends("Glyph", &MODEL);
        assert!(GLYPH.is_subclass_of(&GLYPH));
        assert!(!OTHER_GLYPH.is_subclass_of(&GLYPH));
    }

    #[test]
    fn model_hierarchy() {
        assert!(HAS_PROPS.is_model());
        assert!(EXPRESSION.is_model());
        assert!(TRANSFORM.is_subclass_of(&MODEL));
        assert!(!BIT_SET.is_model());
        assert_eq!(GLYPH.parent().map(ClassInfo::name), Some("Model"));
    }

    #[test]
    fn debug_shows_name() {
        assert_eq!(format!("{GLYPH:?}"), "ClassInfo(\"Glyph\")");
    }
}
