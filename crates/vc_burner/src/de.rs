use alloc::borrow::Cow;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use vc_bean::decode::decode_primitive;
use vc_bean::{
    BeanDescription, Category, DeserializerModifier, Primitive, PropertyDescriptor, PropertyError,
    ReflectSettableProperty, SettableProperty, Value, ValueDecoder,
};

use crate::classify::classify_setter;
use crate::collector::{PropertyCollector, PropertySlot, Side};
use crate::dispatch::{BeanPropertyMutator, set_primitive};
use crate::module::BurnerConfig;
use crate::scope::DispatcherScope;

// -----------------------------------------------------------------------------
// OptimizedSettableProperty

/// A [`SettableProperty`] that writes through a generated dispatcher.
///
/// With the category's default decoder the input token is decoded
/// straight into the primitive type and handed to the typed setter; a
/// custom decoder still runs first, and its [`Value`] is narrowed to the
/// slot's category. Unbound instances delegate to the wrapped property.
#[derive(Debug, Clone)]
pub struct OptimizedSettableProperty {
    original: Arc<dyn SettableProperty>,
    slot: PropertySlot,
    mutator: Option<Arc<dyn BeanPropertyMutator>>,
}

impl OptimizedSettableProperty {
    /// Creates an unbound property dispatching to `slot` once bound.
    #[inline]
    pub fn new(original: Arc<dyn SettableProperty>, slot: PropertySlot) -> Self {
        Self {
            original,
            slot,
            mutator: None,
        }
    }

    /// Returns a copy bound to `mutator`.
    #[inline]
    pub fn with_mutator(&self, mutator: Arc<dyn BeanPropertyMutator>) -> Self {
        Self {
            mutator: Some(mutator),
            ..self.clone()
        }
    }

    #[inline]
    pub fn slot(&self) -> PropertySlot {
        self.slot
    }

    #[inline]
    pub fn original(&self) -> &Arc<dyn SettableProperty> {
        &self.original
    }

    #[inline]
    pub fn mutator(&self) -> Option<&Arc<dyn BeanPropertyMutator>> {
        self.mutator.as_ref()
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.mutator.is_some()
    }

    fn value_mismatch(&self, found: Category) -> PropertyError {
        PropertyError::ValueMismatch {
            property: Cow::Owned(self.name().into()),
            expected: self.slot.category(),
            found,
        }
    }

    fn narrow<P: Primitive>(&self, value: &Value) -> Result<P, PropertyError> {
        P::from_value(value).ok_or_else(|| self.value_mismatch(value.category()))
    }

    fn set_narrowed<P: Primitive>(
        &self,
        mutator: &dyn BeanPropertyMutator,
        bean: &mut dyn Any,
        value: &Value,
    ) -> Result<(), PropertyError> {
        let value = self.narrow::<P>(value)?;
        Ok(set_primitive(mutator, bean, self.slot.index(), value)?)
    }

    fn decode_and_set<P: Primitive>(
        &self,
        mutator: &dyn BeanPropertyMutator,
        deserializer: &mut dyn erased_serde::Deserializer<'_>,
        bean: &mut dyn Any,
    ) -> Result<(), PropertyError> {
        let value = decode_primitive::<P>(deserializer).map_err(|source| self.decode_error(source))?;
        Ok(set_primitive(mutator, bean, self.slot.index(), value)?)
    }

    fn decode_error(&self, source: erased_serde::Error) -> PropertyError {
        PropertyError::Decode {
            property: Cow::Owned(self.name().into()),
            source,
        }
    }

    fn rewrap(&self, original: Arc<dyn SettableProperty>) -> Arc<dyn SettableProperty> {
        Arc::new(Self {
            original,
            ..self.clone()
        })
    }
}

impl SettableProperty for OptimizedSettableProperty {
    #[inline]
    fn name(&self) -> &str {
        self.original.name()
    }

    #[inline]
    fn descriptor(&self) -> &Arc<PropertyDescriptor> {
        self.original.descriptor()
    }

    #[inline]
    fn decoder(&self) -> &ValueDecoder {
        self.original.decoder()
    }

    fn set(&self, bean: &mut dyn Any, value: Value) -> Result<(), PropertyError> {
        let Some(mutator) = &self.mutator else {
            return self.original.set(bean, value);
        };
        let mutator = &**mutator;
        match self.slot.category() {
            Category::Boolean => self.set_narrowed::<bool>(mutator, bean, &value),
            Category::Short => self.set_narrowed::<i16>(mutator, bean, &value),
            Category::Int => self.set_narrowed::<i32>(mutator, bean, &value),
            Category::Long => self.set_narrowed::<i64>(mutator, bean, &value),
            Category::Float => self.set_narrowed::<f32>(mutator, bean, &value),
            Category::Double => self.set_narrowed::<f64>(mutator, bean, &value),
            Category::Object => match value {
                Value::Object(object) => Ok(mutator.object_setter(bean, self.slot.index(), object)?),
                other => Err(self.value_mismatch(other.category())),
            },
        }
    }

    fn deserialize_and_set(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'_>,
        bean: &mut dyn Any,
    ) -> Result<(), PropertyError> {
        let Some(mutator) = &self.mutator else {
            return self.original.deserialize_and_set(deserializer, bean);
        };
        let decoder = self.original.decoder();
        if !decoder.is_default() || decoder.category() != self.slot.category() {
            let value = decoder.decode(deserializer).map_err(|source| self.decode_error(source))?;
            return self.set(bean, value);
        }

        let mutator = &**mutator;
        match self.slot.category() {
            Category::Boolean => self.decode_and_set::<bool>(mutator, deserializer, bean),
            Category::Short => self.decode_and_set::<i16>(mutator, deserializer, bean),
            Category::Int => self.decode_and_set::<i32>(mutator, deserializer, bean),
            Category::Long => self.decode_and_set::<i64>(mutator, deserializer, bean),
            Category::Float => self.decode_and_set::<f32>(mutator, deserializer, bean),
            Category::Double => self.decode_and_set::<f64>(mutator, deserializer, bean),
            Category::Object => {
                let value = decoder.decode(deserializer).map_err(|source| self.decode_error(source))?;
                self.set(bean, value)
            }
        }
    }

    fn with_name(&self, name: Cow<'static, str>) -> Arc<dyn SettableProperty> {
        self.rewrap(self.original.with_name(name))
    }

    fn with_decoder(&self, decoder: ValueDecoder) -> Arc<dyn SettableProperty> {
        self.rewrap(self.original.with_decoder(decoder))
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

// -----------------------------------------------------------------------------
// BurnerDeserializerModifier

/// Replaces eligible generic settable properties of a bean with
/// [`OptimizedSettableProperty`]s sharing one write dispatcher.
#[derive(Debug, Clone)]
pub struct BurnerDeserializerModifier {
    scope: Arc<DispatcherScope>,
    config: BurnerConfig,
}

impl BurnerDeserializerModifier {
    #[inline]
    pub fn new(scope: Arc<DispatcherScope>, config: BurnerConfig) -> Self {
        Self { scope, config }
    }

    fn collect(
        &self,
        collector: &mut PropertyCollector,
        property: &Arc<dyn SettableProperty>,
    ) -> Option<PropertySlot> {
        if !property.as_any().is::<ReflectSettableProperty>() {
            log::trace!("keeping custom settable property `{}`", property.name());
            return None;
        }
        let descriptor = property.descriptor();
        let Some(category) = classify_setter(descriptor, &self.config) else {
            log::trace!("`{}` is not eligible for optimized writes", property.name());
            return None;
        };
        Some(collector.add_property(Arc::clone(descriptor), category))
    }
}

impl DeserializerModifier for BurnerDeserializerModifier {
    fn update_properties(
        &self,
        bean: &BeanDescription,
        properties: Vec<Arc<dyn SettableProperty>>,
    ) -> Vec<Arc<dyn SettableProperty>> {
        let mut collector = PropertyCollector::new(Side::Write);
        let stubs: Vec<Option<OptimizedSettableProperty>> = properties
            .iter()
            .map(|property| {
                self.collect(&mut collector, property)
                    .map(|slot| OptimizedSettableProperty::new(Arc::clone(property), slot))
            })
            .collect();

        if collector.is_empty() {
            return properties;
        }

        let plan = collector.into_plan(bean);
        let mutator = match self.scope.get_or_create_mutator(bean, &plan) {
            Ok(mutator) => mutator,
            Err(e) => {
                log::warn!("keeping generic settable properties for `{}`: {e}", bean.type_path());
                return properties;
            }
        };

        properties
            .into_iter()
            .zip(stubs)
            .map(|(property, stub)| match stub {
                Some(stub) => Arc::new(stub.with_mutator(Arc::clone(&mutator))) as Arc<dyn SettableProperty>,
                None => property,
            })
            .collect()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::borrow::Cow;
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use vc_bean::{
        Bean, BeanMapper, Category, DeserializerModifier, ReflectSettableProperty, SettableProperty, Value,
        ValueDecoder,
    };

    use super::{BurnerDeserializerModifier, OptimizedSettableProperty};
    use crate::collector::PropertySlot;
    use crate::module::BurnerConfig;
    use crate::scope::DispatcherScope;
    use crate::testing::{Point, Profile};

    fn generic_settables<T: Bean>() -> Vec<Arc<dyn SettableProperty>> {
        T::describe()
            .properties()
            .iter()
            .filter_map(|p| ReflectSettableProperty::new(Arc::clone(p)))
            .map(|p| Arc::new(p) as Arc<dyn SettableProperty>)
            .collect()
    }

    fn modify<T: Bean>(name: &'static str) -> Vec<Arc<dyn SettableProperty>> {
        let scope = Arc::new(DispatcherScope::new(name));
        let modifier = BurnerDeserializerModifier::new(scope, BurnerConfig::default());
        modifier.update_properties(&T::describe(), generic_settables::<T>())
    }

    fn optimized(property: &Arc<dyn SettableProperty>) -> Option<&OptimizedSettableProperty> {
        property.as_any().downcast_ref::<OptimizedSettableProperty>()
    }

    fn feed(property: &dyn SettableProperty, json: &str, bean: &mut dyn core::any::Any) -> Result<(), String> {
        let mut de = serde_json::Deserializer::from_str(json);
        let mut erased = <dyn erased_serde::Deserializer>::erase(&mut de);
        property
            .deserialize_and_set(&mut erased, bean)
            .map_err(|e| e.to_string())
    }

    #[test]
    fn private_setters_stay_generic() {
        let properties = modify::<Point>("de-private");
        let slots: Vec<_> = properties
            .iter()
            .map(|p| optimized(p).map(OptimizedSettableProperty::slot))
            .collect();
        assert_eq!(
            slots,
            [
                Some(PropertySlot::new(Category::Int, 0)),
                Some(PropertySlot::new(Category::Int, 1)),
                None,
            ]
        );
    }

    #[test]
    fn decodes_and_narrows() {
        let properties = modify::<Point>("de-narrow");
        let mut point = Point::default();

        feed(&*properties[0], "12", &mut point).unwrap();
        feed(&*properties[1], "\"34\"", &mut point).unwrap();
        feed(&*properties[2], "56", &mut point).unwrap();
        assert_eq!((point.x, point.y, point.id), (12, 34, 56));

        // Boxed values of another numeric category are narrowed.
        properties[0].set(&mut point, Value::Long(7)).unwrap();
        properties[1].set(&mut point, Value::Double(8.9)).unwrap();
        assert_eq!((point.x, point.y), (7, 8));

        let err = properties[0].set(&mut point, Value::Boolean(true)).unwrap_err();
        assert!(err.to_string().contains("`x`"));

        let err = feed(&*properties[0], "[1]", &mut point).unwrap_err();
        assert!(err.contains("`x`"));
    }

    #[test]
    fn rederived_properties_keep_slot() {
        let properties = modify::<Point>("de-rederive");
        let y = optimized(&properties[1]).unwrap().slot();

        let renamed = properties[1].with_name(Cow::Borrowed("ordinate"));
        assert_eq!(renamed.name(), "ordinate");
        assert_eq!(optimized(&renamed).map(OptimizedSettableProperty::slot), Some(y));
        assert!(optimized(&renamed).unwrap().is_bound());

        let doubled = renamed.with_decoder(ValueDecoder::custom("doubled", Category::Int, |de| {
            let v = vc_bean::decode::decode_primitive::<i32>(de)?;
            Ok(Value::Int(v * 2))
        }));
        assert_eq!(optimized(&doubled).map(OptimizedSettableProperty::slot), Some(y));
        assert_eq!(doubled.decoder().name(), "doubled");

        let mut point = Point::default();
        feed(&*doubled, "21", &mut point).unwrap();
        assert_eq!(point.y, 42);
    }

    #[test]
    fn unbound_property_delegates() {
        let original = generic_settables::<Point>().remove(0);
        let property = OptimizedSettableProperty::new(original, PropertySlot::new(Category::Int, 9));
        let mut point = Point::default();
        feed(&property, "5", &mut point).unwrap();
        assert_eq!(point.x, 5);
    }

    #[test]
    fn objects_go_through_dispatch() {
        let properties = modify::<Profile>("de-objects");
        let tags = properties.iter().find(|p| p.name() == "tags").unwrap();
        assert_eq!(
            optimized(tags).map(OptimizedSettableProperty::slot),
            Some(PropertySlot::new(Category::Object, 1))
        );

        let mut profile = Profile::sample();
        feed(&**tags, r#"["x", "y"]"#, &mut profile).unwrap();
        assert_eq!(profile.tags, ["x", "y"]);

        let err = tags.set(&mut profile, Value::Int(1)).unwrap_err();
        assert!(err.to_string().contains("`tags`"));
    }

    #[test]
    fn mapper_round_trip_matches_generic() {
        let plain = BeanMapper::new();
        let mut optimized = BeanMapper::new();
        optimized.add_deserializer_modifier(Arc::new(BurnerDeserializerModifier::new(
            Arc::new(DispatcherScope::new("de-mapper")),
            BurnerConfig::default(),
        )));

        let json = r#"{"name":"lin","tags":["a"],"level":3,"ratio":0.5,"enabled":true,"weight":2.25}"#;
        let a: Profile = optimized.deserialize(&mut serde_json::Deserializer::from_str(json)).unwrap();
        let b: Profile = plain.deserialize(&mut serde_json::Deserializer::from_str(json)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.name, "lin");
        assert_eq!(a.level, 3);
    }
}
