use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    domain::question::{DisplayRecord, QuestionDetail, QuestionSlug, DEFAULT_PROBLEM_URL_TEMPLATE},
    errors::{DrawError, FetchError},
};

/// Read side of the question catalog.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn list_slugs(&self) -> Result<Vec<QuestionSlug>, FetchError>;
    async fn question_detail(&self, slug: &QuestionSlug) -> Result<QuestionDetail, FetchError>;
}

#[async_trait]
impl<T> QuestionSource for Arc<T>
where
    T: QuestionSource + ?Sized,
{
    async fn list_slugs(&self) -> Result<Vec<QuestionSlug>, FetchError> {
        (**self).list_slugs().await
    }

    async fn question_detail(&self, slug: &QuestionSlug) -> Result<QuestionDetail, FetchError> {
        (**self).question_detail(slug).await
    }
}

pub trait SlugPicker: Send + Sync {
    fn pick<'a>(&self, slugs: &'a [QuestionSlug]) -> Option<&'a QuestionSlug>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UniformPicker;

impl SlugPicker for UniformPicker {
    fn pick<'a>(&self, slugs: &'a [QuestionSlug]) -> Option<&'a QuestionSlug> {
        slugs.choose(&mut rand::thread_rng())
    }
}

/// Reproducible picker; the same seed over the same catalog yields the same sequence.
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl SlugPicker for SeededPicker {
    fn pick<'a>(&self, slugs: &'a [QuestionSlug]) -> Option<&'a QuestionSlug> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        slugs.choose(&mut *rng)
    }
}

pub struct QuestionSelector<S> {
    source: S,
    picker: Box<dyn SlugPicker>,
    url_template: String,
}

impl<S> QuestionSelector<S>
where
    S: QuestionSource,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            picker: Box::new(UniformPicker),
            url_template: DEFAULT_PROBLEM_URL_TEMPLATE.to_owned(),
        }
    }

    pub fn with_picker(mut self, picker: impl SlugPicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    pub fn with_url_template(mut self, url_template: impl Into<String>) -> Self {
        self.url_template = url_template.into();
        self
    }

    /// Picks one catalog question at random and returns its display form.
    ///
    /// A failure at any stage ends the draw; nothing is retried.
    pub async fn draw(&self) -> Result<DisplayRecord, DrawError> {
        let slugs = self.source.list_slugs().await.map_err(DrawError::Catalog)?;
        let Some(slug) = self.picker.pick(&slugs).cloned() else {
            warn!(event_name = "draw.catalog.empty", "question catalog returned no slugs");
            return Err(DrawError::EmptyCatalog);
        };
        debug!(
            event_name = "draw.slug.selected",
            slug = %slug,
            catalog_size = slugs.len(),
            "selected question slug"
        );

        let mut detail =
            self.source.question_detail(&slug).await.map_err(DrawError::Detail)?;
        if detail.slug.is_blank() {
            detail.slug = slug;
        }

        let record = DisplayRecord::from_detail(detail, &self.url_template);
        info!(
            event_name = "draw.completed",
            question_id = %record.id,
            slug = %record.slug,
            difficulty = %record.difficulty,
            "question drawn"
        );
        Ok(record)
    }
}
