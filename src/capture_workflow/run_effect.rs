use crate::capture_workflow::core::{Effect, Event};
use crate::classify_pipeline::{CancelToken, ClassifyPipeline};
use crate::device_camera::interface::{CameraSession, DeviceCamera, Photo};
use crate::device_permission::interface::DevicePermission;
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

/// The open camera and the cycle it was opened for.
type OpenSession = (u64, Box<dyn CameraSession>);

#[derive(Clone)]
pub struct RunEffect {
    logger: Arc<dyn Logger + Send + Sync>,
    device_permission: Arc<dyn DevicePermission + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    camera_session: Arc<Mutex<Option<OpenSession>>>,
    classify_pipeline: Arc<ClassifyPipeline>,
    current_cycle: Arc<AtomicU64>,
    event_sender: Sender<Event>,
}

impl RunEffect {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        device_permission: Arc<dyn DevicePermission + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        classify_pipeline: Arc<ClassifyPipeline>,
        current_cycle: Arc<AtomicU64>,
        event_sender: Sender<Event>,
    ) -> Self {
        Self {
            logger: logger.with_namespace("run_effect"),
            device_permission,
            device_camera,
            camera_session: Arc::new(Mutex::new(None)),
            classify_pipeline,
            current_cycle,
            event_sender,
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::RequestPermission => {
                let status = self.device_permission.request_camera();
                let _ = self.event_sender.send(Event::PermissionDone(status));
            }
            Effect::ActivateCamera { cycle } => {
                let result = self.activate_camera(cycle);
                let _ = self
                    .event_sender
                    .send(Event::CameraActivateDone { cycle, result });
            }
            Effect::DeactivateCamera { cycle } => {
                if let Err(e) = self.deactivate_camera(Some(cycle)) {
                    let _ = self
                        .logger
                        .error(&format!("Failed to stop camera: {}", e));
                }
            }
            Effect::CapturePhoto => {
                let photo = self.capture_photo();
                let _ = self.event_sender.send(Event::CaptureDone(photo));
            }
            Effect::Classify { photo, cycle } => {
                let cancel = CancelToken::new(cycle, Arc::clone(&self.current_cycle));
                let result = self.classify_pipeline.run(&photo, &cancel);
                if let Err(e) = &result {
                    let _ = self
                        .logger
                        .error(&format!("Classification of cycle {} failed: {}", cycle, e));
                }
                let _ = self
                    .event_sender
                    .send(Event::ClassifyDone { cycle, result });
            }
        }
    }

    /// Releases the camera, whatever cycle it belongs to.
    pub fn shutdown(&self) {
        if let Err(e) = self.deactivate_camera(None) {
            let _ = self
                .logger
                .error(&format!("Failed to stop camera: {}", e));
        }
    }

    fn activate_camera(&self, cycle: u64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut slot = self
            .camera_session
            .lock()
            .map_err(|_| "camera session lock poisoned")?;

        if self.current_cycle.load(Ordering::SeqCst) != cycle {
            return Err("camera activation superseded".into());
        }

        if let Some((previous_cycle, mut previous)) = slot.take() {
            let _ = self.logger.info(&format!(
                "Releasing camera from cycle {}",
                previous_cycle
            ));
            previous.close()?;
        }

        *slot = Some((cycle, self.device_camera.open()?));
        Ok(())
    }

    fn deactivate_camera(
        &self,
        cycle: Option<u64>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut slot = self
            .camera_session
            .lock()
            .map_err(|_| "camera session lock poisoned")?;

        let owned_by_cycle = match (slot.as_ref(), cycle) {
            (Some((open_cycle, _)), Some(cycle)) => *open_cycle == cycle,
            (Some(_), None) => true,
            (None, _) => false,
        };

        if owned_by_cycle {
            if let Some((_, mut session)) = slot.take() {
                session.close()?;
            }
        }
        Ok(())
    }

    fn capture_photo(&self) -> Result<Photo, Box<dyn std::error::Error + Send + Sync>> {
        let mut slot = self
            .camera_session
            .lock()
            .map_err(|_| "camera session lock poisoned")?;

        match slot.as_mut() {
            Some((_, session)) => session.take_picture(),
            None => Err("camera is not active".into()),
        }
    }
}
