use std::sync::Arc;

use log::{debug, info};

use crate::{
    error::Result,
    evaluator::{Evaluator, EvaluatorConfig},
    options::{Backing, OptionKey, OptionStore},
    render::{Render, Selection},
};

/// The operations a host page (or any other front end) calls.
///
/// `init_storage` must run before anything else.
pub trait TruthTester {
    fn init_storage(&mut self) -> Result<()>;
    fn render_all(&mut self, input: &str) -> Result<()>;
    fn render_successes(&mut self, input: &str) -> Result<()>;
    fn render_failures(&mut self, input: &str) -> Result<()>;
    fn change_value(&mut self, id: &str, value: &str) -> Result<()>;
    fn get_value(&self, id: &str) -> Result<String>;
}

/// A [`TruthTester`] built from an injected store, a renderer and an
/// optional persistence backing.
pub struct Session<R> {
    evaluator: Evaluator,
    renderer: R,
    backing: Option<Box<dyn Backing>>,
}

impl<R: Render> Session<R> {
    pub fn new(store: Arc<OptionStore>, config: EvaluatorConfig, renderer: R) -> Self {
        Self {
            evaluator: Evaluator::new(store, config),
            renderer,
            backing: None,
        }
    }

    pub fn with_backing(mut self, backing: impl Backing + 'static) -> Self {
        self.backing = Some(Box::new(backing));
        self
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn render(&mut self, input: &str, selection: Selection) -> Result<()> {
        debug!("rendering {selection:?} rows of {input:?}");
        let result = self.evaluator.evaluate_all(input)?;
        self.renderer.render(&result, selection)
    }
}

impl<R: Render> TruthTester for Session<R> {
    fn init_storage(&mut self) -> Result<()> {
        info!("initializing storage");
        self.evaluator.store().init(self.backing.as_deref())
    }

    fn render_all(&mut self, input: &str) -> Result<()> {
        self.render(input, Selection::All)
    }

    fn render_successes(&mut self, input: &str) -> Result<()> {
        self.render(input, Selection::Successes)
    }

    fn render_failures(&mut self, input: &str) -> Result<()> {
        self.render(input, Selection::Failures)
    }

    fn change_value(&mut self, id: &str, value: &str) -> Result<()> {
        let key: OptionKey = id.parse()?;
        self.evaluator.store().set(key, value);
        if let Some(backing) = &self.backing {
            backing.save(key, value)?;
        }
        Ok(())
    }

    fn get_value(&self, id: &str) -> Result<String> {
        let key: OptionKey = id.parse()?;
        Ok(self.evaluator.store().get(key))
    }
}
