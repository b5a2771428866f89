use crate::analyzer::core::{init, transition, Effect, Model, Msg};
use crate::analyzer::run_effect::RunEffect;
use crate::config::Config;
use crate::library::logger::interface::Logger;
use crate::predictor::interface::Predictor;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Owns the model. Messages come either from the UI (`dispatch`) or from
/// effect threads (drained by `poll`); both go through `transition`.
pub struct Analyzer {
    model: Model,
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    event_receiver: Receiver<Msg>,
    run_effect: RunEffect,
}

impl Analyzer {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        predictor: Arc<dyn Predictor + Send + Sync>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        let logger = logger.with_namespace("analyzer");
        let run_effect = RunEffect::new(
            config.clone(),
            logger.clone(),
            predictor,
            event_sender,
        );
        let (model, effects) = init(&config);

        let analyzer = Self {
            model,
            config,
            logger,
            event_receiver,
            run_effect,
        };
        analyzer.spawn_effects(effects);
        analyzer
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn dispatch(&mut self, msg: Msg) {
        if !matches!(msg, Msg::Tick(_) | Msg::ProgressTick { .. }) {
            let _ = self.logger.info(&format!("msg: {:?}", msg));
        }

        let (model, effects) = transition(&self.config, self.model.clone(), msg);
        self.model = model;

        if !effects.is_empty() {
            let _ = self.logger.info(&format!("effects: {:?}", effects));
        }
        self.spawn_effects(effects);
    }

    /// Applies every message the effect threads have sent so far. Returns how
    /// many were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.event_receiver.try_recv() {
            self.dispatch(msg);
            applied += 1;
        }
        applied
    }

    fn spawn_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let run_effect = self.run_effect.clone();
            std::thread::spawn(move || run_effect.run_effect(effect));
        }
    }

    #[cfg(test)]
    pub fn run_effect(&self) -> &RunEffect {
        &self.run_effect
    }
}
