use crate::capture_workflow::core::{init, transition, Effect, Event, Model};
use crate::capture_workflow::render::Render;
use crate::capture_workflow::run_effect::RunEffect;
use crate::classify_pipeline::ClassifyPipeline;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::device_permission::interface::DevicePermission;
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

pub struct CaptureWorkflow {
    model: Arc<Mutex<Model>>,
    event_sender: Sender<Event>,
    event_receiver: Mutex<Receiver<Event>>,
    current_cycle: Arc<AtomicU64>,
    logger: Arc<dyn Logger + Send + Sync>,
    render: Render,
    run_effect: RunEffect,
}

impl CaptureWorkflow {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        device_permission: Arc<dyn DevicePermission + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        classify_pipeline: Arc<ClassifyPipeline>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        let current_cycle = Arc::new(AtomicU64::new(0));
        let run_effect = RunEffect::new(
            logger.clone(),
            device_permission,
            device_camera,
            classify_pipeline,
            current_cycle.clone(),
            event_sender.clone(),
        );

        Self {
            model: Arc::new(Mutex::new(init().0)),
            event_sender,
            event_receiver: Mutex::new(event_receiver),
            current_cycle,
            logger: logger.with_namespace("capture_workflow"),
            render: Render::new(device_display),
            run_effect,
        }
    }

    /// Where front ends push user actions.
    pub fn event_sender(&self) -> Sender<Event> {
        self.event_sender.clone()
    }

    #[allow(dead_code)]
    pub fn model(&self) -> Option<Model> {
        self.model.lock().ok().map(|model| model.clone())
    }

    fn spawn_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let run_effect = self.run_effect.clone();
            std::thread::spawn(move || run_effect.run_effect(effect));
        }
    }

    fn commit(&self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.current_cycle.store(model.cycle, Ordering::SeqCst);
        *self.model.lock().map_err(|_| "model lock poisoned")? = model.clone();

        if let Err(e) = self.render.render(model) {
            self.logger.error(&format!("Failed to render: {}", e))?;
        }
        Ok(())
    }

    /// Runs until a `Quit` event arrives. Releases the camera on the way out.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let event_receiver = self
            .event_receiver
            .lock()
            .map_err(|_| "event receiver lock poisoned")?;

        let (mut current_model, effects) = init();
        self.commit(&current_model)?;
        self.spawn_effects(effects);

        loop {
            let event = match event_receiver.recv() {
                Ok(event) => event,
                Err(e) => {
                    self.run_effect.shutdown();
                    return Err(Box::new(e));
                }
            };

            if matches!(event, Event::Quit) {
                let _ = self.logger.info("Quit requested");
                self.run_effect.shutdown();
                return Ok(());
            }

            let _ = self.logger.info(&format!(
                "\nold model:\n\t{:?}\n\nevent:\n\t{:?}",
                current_model, event,
            ));
            let (new_model, effects) = transition(current_model, event);
            let _ = self.logger.info(&format!(
                "\nnew model:\n\t{:?}\n\neffects:\n\t{:?}",
                new_model, effects
            ));

            self.commit(&new_model)?;
            self.spawn_effects(effects);
            current_model = new_model;
        }
    }
}
