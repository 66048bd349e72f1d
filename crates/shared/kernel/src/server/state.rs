use axum::extract::FromRef;
use fxhash::FxHashMap;
use orgdir_domain::config::ApiConfig;
use orgdir_domain::registry::{FeatureSlice, InitializedSlice};
use std::any::TypeId;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[orgdir_derive::orgdir_error]
pub enum ApiStateError {
    #[error("State validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("State missing feature slice{}: {message}", format_context(.context))]
    MissingSlice { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug)]
pub struct ApiStateInner {
    pub config: ApiConfig,
    started_at: Instant,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

/// Shared request state: configuration plus the registered feature slices.
#[derive(Debug, Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    #[must_use]
    pub fn builder() -> ApiStateBuilder {
        ApiStateBuilder::default()
    }

    #[must_use]
    pub fn get_slice<T: FeatureSlice>(&self) -> Option<&T> {
        self.inner.slices.get(&TypeId::of::<T>()).and_then(InitializedSlice::downcast_ref::<T>)
    }

    /// # Errors
    /// Returns [`ApiStateError::MissingSlice`] if `T` was never registered.
    pub fn try_get_slice<T: FeatureSlice>(&self) -> Result<&T, ApiStateError> {
        self.get_slice::<T>().ok_or_else(|| ApiStateError::MissingSlice {
            message: std::any::type_name::<T>().into(),
            context: None,
        })
    }

    pub fn slice_ids(&self) -> impl Iterator<Item = &TypeId> {
        self.inner.slices.keys()
    }

    /// Time elapsed since the state was built.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.inner.started_at.elapsed()
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<ApiState> for ApiConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.config.clone()
    }
}

#[derive(Debug, Default)]
pub struct ApiStateBuilder {
    config: Option<ApiConfig>,
    started_at: Option<Instant>,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

impl ApiStateBuilder {
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the start instant reported as uptime; defaults to the moment of `build`.
    #[must_use]
    pub fn started_at(mut self, started_at: Instant) -> Self {
        self.started_at = Some(started_at);
        self
    }

    #[must_use]
    pub fn register_slice(mut self, slice: InitializedSlice) -> Self {
        self.slices.insert(slice.id, slice);
        self
    }

    #[must_use]
    pub fn register_slices<I>(self, slices: I) -> Self
    where
        I: IntoIterator<Item = InitializedSlice>,
    {
        slices.into_iter().fold(self, Self::register_slice)
    }

    /// # Errors
    /// Returns [`ApiStateError::Validation`] when no configuration was provided.
    pub fn build(self) -> Result<ApiState, ApiStateError> {
        let config = self.config.ok_or_else(|| ApiStateError::Validation {
            message: "ApiConfig not provided".into(),
            context: None,
        })?;

        let started_at = self.started_at.unwrap_or_else(Instant::now);

        Ok(ApiState { inner: Arc::new(ApiStateInner { config, started_at, slices: self.slices }) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    #[derive(Debug)]
    struct Counter(u32);

    impl FeatureSlice for Counter {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn build_requires_config() {
        let err = ApiState::builder().build().unwrap_err();
        assert!(matches!(err, ApiStateError::Validation { .. }));
    }

    #[test]
    fn registered_slices_are_retrievable_by_type() {
        let state = ApiState::builder()
            .config(ApiConfig::default())
            .register_slices([InitializedSlice::new(Counter(7))])
            .build()
            .unwrap();

        assert_eq!(state.try_get_slice::<Counter>().unwrap().0, 7);
        assert_eq!(state.slice_ids().count(), 1);
        assert!(state.uptime() < Duration::from_secs(60));
        assert_eq!(ApiConfig::from_ref(&state).directory.cache_max_age_secs, 300);
    }

    #[test]
    fn missing_slice_names_the_type() {
        let state = ApiState::builder().config(ApiConfig::default()).build().unwrap();

        let err = state.try_get_slice::<Counter>().unwrap_err();
        assert!(err.to_string().contains("Counter"), "{err}");
    }
}
