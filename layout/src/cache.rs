//! Interning of generated layouts.
//!
//! Generators are keyed by the canonical signature of their [Descriptor]. Lookups take a
//! read lock; a miss re-checks under the write lock before parsing, so concurrent callers
//! creating the same layout always observe a single [Generator].

use crate::{Descriptor, Error, Generator};
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, RwLock},
};
use tracing::{debug, trace};

static GLOBAL: LazyLock<Cache> = LazyLock::new(Cache::new);

/// A map of canonical signatures to generators.
#[derive(Debug, Default)]
pub struct Cache {
    generators: RwLock<HashMap<String, Arc<Generator>>>,
}

impl Cache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by [Generator::from_compact] and friends.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns the generator for a compact formula.
    pub fn compact(&self, formula: &str) -> Result<Arc<Generator>, Error> {
        self.get_or_create(&Descriptor::compact(formula))
    }

    /// Returns the generator for a mapping of field names to type codes.
    pub fn named<I, K, V>(&self, descriptor: I) -> Result<Arc<Generator>, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.get_or_create(&descriptor.into_iter().collect::<Descriptor>())
    }

    /// Returns the generator for a JSON object of field names to type codes.
    pub fn json(&self, json: &str) -> Result<Arc<Generator>, Error> {
        self.get_or_create(&Descriptor::from_json(json)?)
    }

    /// Returns the cached generator for `descriptor`, building it on first use.
    ///
    /// Nothing is cached if any type code fails to parse.
    pub fn get_or_create(&self, descriptor: &Descriptor) -> Result<Arc<Generator>, Error> {
        let signature = descriptor.signature()?;
        if let Some(generator) = self.generators.read().unwrap().get(&signature) {
            trace!(%signature, "layout cache hit");
            return Ok(generator.clone());
        }

        let mut generators = self.generators.write().unwrap();
        if let Some(generator) = generators.get(&signature) {
            return Ok(generator.clone());
        }
        let generator = Arc::new(Generator::build(descriptor, signature.clone())?);
        debug!(
            %signature,
            fields = generator.len(),
            fixed_len = generator.fixed_len(),
            "generated layout"
        );
        generators.insert(signature, generator.clone());
        Ok(generator)
    }

    /// Number of cached generators.
    pub fn len(&self) -> usize {
        self.generators.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached generator. Generators already handed out stay valid.
    pub fn clear(&self) {
        let mut generators = self.generators.write().unwrap();
        debug!(count = generators.len(), "clearing layout cache");
        generators.clear();
    }
}
