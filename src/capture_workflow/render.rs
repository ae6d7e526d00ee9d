use crate::capture_workflow::core::{CameraState, Model, State};
use crate::device_display::interface::{AlertView, DeviceDisplay, Page, ScreenView};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Render {
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
}

impl Render {
    pub fn new(device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>) -> Self {
        Self { device_display }
    }

    pub fn render(&self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut device_display = self
            .device_display
            .lock()
            .map_err(|_| "display lock poisoned")?;

        device_display.show(&view(model))
    }
}

pub fn view(model: &Model) -> ScreenView {
    let page = match &model.state {
        State::Idle | State::PermissionRequested => Page::Home,
        State::CameraActive { camera } => Page::Camera {
            ready: *camera != CameraState::Starting,
            capturing: *camera == CameraState::Capturing,
        },
        State::Previewing { photo } => Page::Preview {
            photo_uri: photo.uri.clone(),
            classifying: false,
            result: None,
        },
        State::Classifying { photo } => Page::Preview {
            photo_uri: photo.uri.clone(),
            classifying: true,
            result: None,
        },
        State::ResultShown { photo, prediction } => Page::Preview {
            photo_uri: photo.uri.clone(),
            classifying: false,
            result: Some(format!(
                "Class: {} Probability: {}",
                prediction.class_name, prediction.probability
            )),
        },
    };

    ScreenView {
        page,
        alert: model.alert.as_ref().map(|alert| AlertView {
            title: alert.title.clone(),
            message: alert.message.clone(),
        }),
    }
}
