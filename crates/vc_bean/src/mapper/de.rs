use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use foldhash::fast::FixedState;
use hashbrown::HashMap;
use serde_core::Deserializer;
use serde_core::de::{DeserializeSeed, Error, IgnoredAny, MapAccess, Visitor};

use crate::bean::BeanDescription;
use crate::settable::SettableProperty;

/// A fixed hash seed, so lookups do not depend on process randomness.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x95EE04C4F326B271);

// -----------------------------------------------------------------------------
// SettableTable

/// The settable properties of one bean type, addressable by serialized name.
pub struct SettableTable {
    properties: Vec<Arc<dyn SettableProperty>>,
    by_name: HashMap<Box<str>, usize, FixedState>,
}

impl SettableTable {
    pub(super) fn new(properties: Vec<Arc<dyn SettableProperty>>) -> Self {
        let mut by_name = HashMap::with_capacity_and_hasher(properties.len(), FIXED_HASH_STATE);
        for (index, property) in properties.iter().enumerate() {
            // Earlier properties win on duplicate names.
            by_name.entry(Box::from(property.name())).or_insert(index);
        }
        Self { properties, by_name }
    }

    /// Properties in their final (post-modifier) order.
    #[inline]
    pub fn properties(&self) -> &[Arc<dyn SettableProperty>] {
        &self.properties
    }

    pub fn find(&self, name: &str) -> Option<&Arc<dyn SettableProperty>> {
        self.by_name.get(name).map(|&index| &self.properties[index])
    }
}

impl fmt::Debug for SettableTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.properties.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Visitors

struct PropertySeed<'a> {
    property: &'a dyn SettableProperty,
    bean: &'a mut dyn Any,
}

impl<'de> DeserializeSeed<'de> for PropertySeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        self.property
            .deserialize_and_set(&mut erased, self.bean)
            .map_err(D::Error::custom)
    }
}

struct BeanVisitor<'a> {
    bean: &'a mut dyn Any,
    table: &'a SettableTable,
    description: &'a BeanDescription,
    fail_on_unknown: bool,
}

impl<'de> Visitor<'de> for BeanVisitor<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a map of `{}` properties", self.description.type_ident())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        while let Some(key) = map.next_key::<String>()? {
            if let Some(property) = self.table.find(&key) {
                map.next_value_seed(PropertySeed {
                    property: &**property,
                    bean: &mut *self.bean,
                })?;
            } else if !self.fail_on_unknown || self.description.property(&key).is_some() {
                // Read-only properties are skipped silently.
                map.next_value::<IgnoredAny>()?;
            } else {
                return Err(A::Error::custom(format_args!(
                    "unknown property `{key}` for `{}`",
                    self.description.type_path()
                )));
            }
        }
        Ok(())
    }
}

pub(super) fn deserialize_into<'de, D: Deserializer<'de>>(
    deserializer: D,
    bean: &mut dyn Any,
    table: &SettableTable,
    description: &BeanDescription,
    fail_on_unknown: bool,
) -> Result<(), D::Error> {
    deserializer.deserialize_map(BeanVisitor {
        bean,
        table,
        description,
        fail_on_unknown,
    })
}
