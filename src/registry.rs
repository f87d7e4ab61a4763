// ABOUTME: Discriminator-keyed factory for load strategies, set schemes, and progressions
// ABOUTME: Decodes tagged JSON payloads into trait objects and encodes them back, including nesting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Strategy Factory
//!
//! Each strategy family keeps its own `type` -> constructor map. Decoding reads
//! only the `type` field first, then hands the whole payload to the registered
//! constructor. Constructors receive the factory itself so decorators such as
//! `TAPER` can decode their embedded strategy through the same registry.
//!
//! New variants register at runtime without touching dispatch code:
//!
//! ```rust,no_run
//! use liftplan::registry::{decode_load_strategy, StrategyFactory};
//! use liftplan::load::{FindRmStrategy, LoadStrategy};
//! # fn main() -> liftplan::errors::AppResult<()> {
//! let mut factory = StrategyFactory::empty();
//! factory.register_load_strategy("FIND_RM", decode_load_strategy::<FindRmStrategy>)?;
//! let strategy = factory.load_strategy_from_json(r#"{"type":"FIND_RM","targetReps":3}"#)?;
//! assert_eq!(strategy.strategy_type(), "FIND_RM");
//! # Ok(())
//! # }
//! ```

use crate::errors::{AppError, AppResult};
use crate::load::{
    FindRmStrategy, LoadStrategy, PercentOfStrategy, RelativeToStrategy, RpeTargetStrategy,
    TaperStrategy,
};
use crate::progression::{
    DeloadOnFailure, GreySkullProgression, LinearProgression, Progression, StageProgression,
};
use crate::set_scheme::{
    AmrapScheme, FatigueDropScheme, FixedScheme, GreySkullScheme, MrsScheme, SetScheme,
    TotalRepsScheme,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

/// Constructor turning a tagged payload into a family member
pub type Constructor<T> = fn(&Value, &StrategyFactory) -> AppResult<Box<T>>;

/// Only the discriminator of a payload
#[derive(Deserialize)]
struct TypeTag {
    #[serde(rename = "type")]
    kind: String,
}

fn discriminator(payload: &Value) -> AppResult<String> {
    if !payload.is_object() {
        return Err(AppError::invalid_params(
            "strategy payload must be a JSON object",
        ));
    }
    let tag = TypeTag::deserialize(payload)
        .map_err(|e| AppError::invalid_params(format!("missing 'type' discriminator: {e}")))?;
    if tag.kind.trim().is_empty() {
        return Err(AppError::invalid_params("'type' discriminator is empty"));
    }
    Ok(tag.kind)
}

/// Serialize `body` and stamp it with a `type` discriminator
///
/// # Errors
///
/// Returns `SerializationError` if `body` does not serialize to a JSON object
pub fn tagged_payload<T: Serialize + ?Sized>(kind: &str, body: &T) -> AppResult<Value> {
    let mut value = serde_json::to_value(body)?;
    let map = value.as_object_mut().ok_or_else(|| {
        AppError::serialization(format!("{kind} payload did not serialize to an object"))
    })?;
    map.insert("type".to_owned(), Value::String(kind.to_owned()));
    Ok(value)
}

/// Decode and validate a plain serde load strategy
///
/// # Errors
///
/// Returns `SerializationError` for malformed payloads or the variant's
/// validation error
pub fn decode_load_strategy<S>(
    payload: &Value,
    _factory: &StrategyFactory,
) -> AppResult<Box<dyn LoadStrategy>>
where
    S: LoadStrategy + DeserializeOwned + 'static,
{
    let strategy = S::deserialize(payload)?;
    strategy.validate()?;
    Ok(Box::new(strategy))
}

/// Decode and validate a plain serde set scheme
///
/// # Errors
///
/// Returns `SerializationError` for malformed payloads or the variant's
/// validation error
pub fn decode_set_scheme<S>(payload: &Value, _factory: &StrategyFactory) -> AppResult<Box<dyn SetScheme>>
where
    S: SetScheme + DeserializeOwned + 'static,
{
    let scheme = S::deserialize(payload)?;
    scheme.validate()?;
    Ok(Box::new(scheme))
}

/// Decode and validate a plain serde progression
///
/// # Errors
///
/// Returns `SerializationError` for malformed payloads or the variant's
/// validation error
pub fn decode_progression<P>(
    payload: &Value,
    _factory: &StrategyFactory,
) -> AppResult<Box<dyn Progression>>
where
    P: Progression + DeserializeOwned + 'static,
{
    let progression = P::deserialize(payload)?;
    progression.validate()?;
    Ok(Box::new(progression))
}

/// Constructor map for one family
struct TypeRegistry<T: ?Sized> {
    family: &'static str,
    constructors: HashMap<String, Constructor<T>>,
}

impl<T: ?Sized> TypeRegistry<T> {
    fn new(family: &'static str) -> Self {
        Self {
            family,
            constructors: HashMap::new(),
        }
    }

    fn register(&mut self, discriminator: &str, constructor: Constructor<T>) -> AppResult<()> {
        if self.constructors.contains_key(discriminator) {
            return Err(AppError::already_registered(self.family, discriminator));
        }
        debug!(family = self.family, discriminator, "registered constructor");
        self.constructors
            .insert(discriminator.to_owned(), constructor);
        Ok(())
    }

    /// Seed a fresh map; built-in discriminators are unique constants
    fn seed(&mut self, builtins: impl IntoIterator<Item = (&'static str, Constructor<T>)>) {
        self.constructors.extend(
            builtins
                .into_iter()
                .map(|(discriminator, constructor)| (discriminator.to_owned(), constructor)),
        );
    }

    fn contains(&self, discriminator: &str) -> bool {
        self.constructors.contains_key(discriminator)
    }

    fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.constructors.keys().cloned().collect();
        types.sort();
        types
    }

    fn construct(&self, payload: &Value, factory: &StrategyFactory) -> AppResult<Box<T>> {
        let kind = discriminator(payload)?;
        let constructor = self
            .constructors
            .get(&kind)
            .ok_or_else(|| AppError::type_not_registered(self.family, &kind))?;
        constructor(payload, factory)
    }
}

/// Registry of constructors for all three strategy families
pub struct StrategyFactory {
    load_strategies: TypeRegistry<dyn LoadStrategy>,
    set_schemes: TypeRegistry<dyn SetScheme>,
    progressions: TypeRegistry<dyn Progression>,
}

impl fmt::Debug for StrategyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyFactory")
            .field("load_strategies", &self.load_strategies.types())
            .field("set_schemes", &self.set_schemes.types())
            .field("progressions", &self.progressions.types())
            .finish()
    }
}

impl Default for StrategyFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyFactory {
    /// Factory with every built-in variant registered
    #[must_use]
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register_builtin_types();
        info!(
            "Strategy factory initialized with {} load strategies, {} set schemes, {} progressions",
            factory.load_strategies.constructors.len(),
            factory.set_schemes.constructors.len(),
            factory.progressions.constructors.len()
        );
        factory
    }

    /// Factory with nothing registered
    #[must_use]
    pub fn empty() -> Self {
        Self {
            load_strategies: TypeRegistry::new("load strategy"),
            set_schemes: TypeRegistry::new("set scheme"),
            progressions: TypeRegistry::new("progression"),
        }
    }

    /// Register all built-in variants
    fn register_builtin_types(&mut self) {
        // Note: When adding new variants, add them to this list
        let load: [(&'static str, Constructor<dyn LoadStrategy>); 5] = [
            (PercentOfStrategy::TYPE, decode_load_strategy::<PercentOfStrategy>),
            (RpeTargetStrategy::TYPE, decode_load_strategy::<RpeTargetStrategy>),
            (FindRmStrategy::TYPE, decode_load_strategy::<FindRmStrategy>),
            (RelativeToStrategy::TYPE, decode_load_strategy::<RelativeToStrategy>),
            (TaperStrategy::TYPE, TaperStrategy::from_payload),
        ];
        self.load_strategies.seed(load);

        let schemes: [(&'static str, Constructor<dyn SetScheme>); 6] = [
            (FixedScheme::TYPE, decode_set_scheme::<FixedScheme>),
            (AmrapScheme::TYPE, decode_set_scheme::<AmrapScheme>),
            (GreySkullScheme::TYPE, decode_set_scheme::<GreySkullScheme>),
            (MrsScheme::TYPE, decode_set_scheme::<MrsScheme>),
            (FatigueDropScheme::TYPE, decode_set_scheme::<FatigueDropScheme>),
            (TotalRepsScheme::TYPE, decode_set_scheme::<TotalRepsScheme>),
        ];
        self.set_schemes.seed(schemes);

        let progressions: [(&'static str, Constructor<dyn Progression>); 4] = [
            (LinearProgression::TYPE, decode_progression::<LinearProgression>),
            (DeloadOnFailure::TYPE, decode_progression::<DeloadOnFailure>),
            (StageProgression::TYPE, decode_progression::<StageProgression>),
            (GreySkullProgression::TYPE, decode_progression::<GreySkullProgression>),
        ];
        self.progressions.seed(progressions);
    }

    // ── Load strategies ─────────────────────────────────────────────────

    /// Register a load strategy constructor
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRegistered` if the discriminator is taken
    pub fn register_load_strategy(
        &mut self,
        discriminator: &str,
        constructor: Constructor<dyn LoadStrategy>,
    ) -> AppResult<()> {
        self.load_strategies.register(discriminator, constructor)
    }

    /// Whether a load strategy discriminator is registered
    #[must_use]
    pub fn has_load_strategy(&self, discriminator: &str) -> bool {
        self.load_strategies.contains(discriminator)
    }

    /// Registered load strategy discriminators, sorted
    #[must_use]
    pub fn load_strategy_types(&self) -> Vec<String> {
        self.load_strategies.types()
    }

    /// Decode a load strategy from a tagged JSON value
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` without a discriminator, `TypeNotRegistered`
    /// for an unknown one, or the variant's decoding/validation error
    pub fn load_strategy_from_value(&self, payload: &Value) -> AppResult<Box<dyn LoadStrategy>> {
        self.load_strategies.construct(payload, self)
    }

    /// Decode a load strategy from JSON text
    ///
    /// # Errors
    ///
    /// See [`Self::load_strategy_from_value`]; also `SerializationError` for invalid JSON
    pub fn load_strategy_from_json(&self, json: &str) -> AppResult<Box<dyn LoadStrategy>> {
        self.load_strategy_from_value(&serde_json::from_str(json)?)
    }

    /// Encode a load strategy as JSON text
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if encoding fails
    pub fn load_strategy_to_json(strategy: &dyn LoadStrategy) -> AppResult<String> {
        Ok(serde_json::to_string(&strategy.to_payload()?)?)
    }

    // ── Set schemes ─────────────────────────────────────────────────────

    /// Register a set scheme constructor
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRegistered` if the discriminator is taken
    pub fn register_set_scheme(
        &mut self,
        discriminator: &str,
        constructor: Constructor<dyn SetScheme>,
    ) -> AppResult<()> {
        self.set_schemes.register(discriminator, constructor)
    }

    /// Whether a set scheme discriminator is registered
    #[must_use]
    pub fn has_set_scheme(&self, discriminator: &str) -> bool {
        self.set_schemes.contains(discriminator)
    }

    /// Registered set scheme discriminators, sorted
    #[must_use]
    pub fn set_scheme_types(&self) -> Vec<String> {
        self.set_schemes.types()
    }

    /// Decode a set scheme from a tagged JSON value
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` without a discriminator, `TypeNotRegistered`
    /// for an unknown one, or the variant's decoding/validation error
    pub fn set_scheme_from_value(&self, payload: &Value) -> AppResult<Box<dyn SetScheme>> {
        self.set_schemes.construct(payload, self)
    }

    /// Decode a set scheme from JSON text
    ///
    /// # Errors
    ///
    /// See [`Self::set_scheme_from_value`]; also `SerializationError` for invalid JSON
    pub fn set_scheme_from_json(&self, json: &str) -> AppResult<Box<dyn SetScheme>> {
        self.set_scheme_from_value(&serde_json::from_str(json)?)
    }

    /// Encode a set scheme as JSON text
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if encoding fails
    pub fn set_scheme_to_json(scheme: &dyn SetScheme) -> AppResult<String> {
        Ok(serde_json::to_string(&scheme.to_payload()?)?)
    }

    // ── Progressions ────────────────────────────────────────────────────

    /// Register a progression constructor
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRegistered` if the discriminator is taken
    pub fn register_progression(
        &mut self,
        discriminator: &str,
        constructor: Constructor<dyn Progression>,
    ) -> AppResult<()> {
        self.progressions.register(discriminator, constructor)
    }

    /// Whether a progression discriminator is registered
    #[must_use]
    pub fn has_progression(&self, discriminator: &str) -> bool {
        self.progressions.contains(discriminator)
    }

    /// Registered progression discriminators, sorted
    #[must_use]
    pub fn progression_types(&self) -> Vec<String> {
        self.progressions.types()
    }

    /// Decode a progression from a tagged JSON value
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` without a discriminator, `TypeNotRegistered`
    /// for an unknown one, or the variant's decoding/validation error
    pub fn progression_from_value(&self, payload: &Value) -> AppResult<Box<dyn Progression>> {
        self.progressions.construct(payload, self)
    }

    /// Decode a progression from JSON text
    ///
    /// # Errors
    ///
    /// See [`Self::progression_from_value`]; also `SerializationError` for invalid JSON
    pub fn progression_from_json(&self, json: &str) -> AppResult<Box<dyn Progression>> {
        self.progression_from_value(&serde_json::from_str(json)?)
    }

    /// Encode a progression as JSON text
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if encoding fails
    pub fn progression_to_json(progression: &dyn Progression) -> AppResult<String> {
        Ok(serde_json::to_string(&progression.to_payload()?)?)
    }
}
