#[cfg(test)]
mod run_effect_test {
    use crate::analyzer::core::{Effect, Msg};
    use crate::analyzer::run_effect::RunEffect;
    use crate::analyzer::tests::fixture::{uploaded_image, Fixture};
    use crate::config::Config;
    use crate::library::logger::impl_console::LoggerConsole;
    use crate::library::logger::interface::Logger;
    use crate::predictor::impl_fake::PredictorFake;
    use crate::predictor::interface::Predictor;
    use std::sync::mpsc::{channel, Receiver};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn runner(analysis_latency: Duration) -> (RunEffect, Receiver<Msg>, Config) {
        let config = Config {
            analysis_latency,
            ..Fixture::fast_config()
        };
        let logger: Arc<dyn Logger + Send + Sync> =
            Arc::new(LoggerConsole::new(config.logger_timezone));
        let predictor: Arc<dyn Predictor + Send + Sync> =
            Arc::new(PredictorFake::new(logger.clone(), config.analysis_latency));
        let (event_sender, event_receiver) = channel();
        let run_effect = RunEffect::new(config.clone(), logger, predictor, event_sender);
        (run_effect, event_receiver, config)
    }

    fn start(analysis_id: u64) -> Effect {
        Effect::StartAnalysis {
            analysis_id,
            image: uploaded_image(40, 30),
        }
    }

    fn drain(event_receiver: &Receiver<Msg>) -> Vec<Msg> {
        event_receiver.try_iter().collect()
    }

    #[test]
    fn test_cancel_stops_ticker_and_result() {
        let (run_effect, event_receiver, config) = runner(Duration::from_secs(5));

        let worker = {
            let run_effect = run_effect.clone();
            std::thread::spawn(move || run_effect.run_effect(start(1)))
        };

        // Wait for the first tick so the analysis is known to be running.
        let first = event_receiver.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(first, Msg::ProgressTick { analysis_id: 1, .. }));
        assert!(run_effect.has_in_flight());

        run_effect.run_effect(Effect::CancelAnalysis { analysis_id: 1 });
        worker.join().unwrap();
        assert!(!run_effect.has_in_flight());

        std::thread::sleep(config.progress_tick_rate * 4);
        drain(&event_receiver);
        std::thread::sleep(config.progress_tick_rate * 10);

        let late = drain(&event_receiver);
        assert!(
            late.iter()
                .all(|msg| !matches!(msg, Msg::ProgressTick { .. } | Msg::AnalysisDone { .. })),
            "Unexpected messages after cancel: {:?}",
            late
        );
    }

    #[test]
    fn test_cancel_before_start() {
        let (run_effect, event_receiver, config) = runner(Duration::from_millis(20));

        run_effect.run_effect(Effect::CancelAnalysis { analysis_id: 1 });
        run_effect.run_effect(start(1));

        assert!(!run_effect.has_in_flight());
        std::thread::sleep(config.progress_tick_rate * 6);
        assert!(drain(&event_receiver).is_empty());

        run_effect.run_effect(start(2));

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut delivered = false;
        while !delivered && Instant::now() < deadline {
            if let Ok(msg) = event_receiver.recv_timeout(Duration::from_millis(50)) {
                delivered = matches!(
                    msg,
                    Msg::AnalysisDone {
                        analysis_id: 2,
                        result: Ok(_),
                        ..
                    }
                );
            }
        }
        assert!(delivered);
        assert!(!run_effect.has_in_flight());
    }
}
