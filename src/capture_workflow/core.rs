use crate::classify_pipeline::ClassifyError;
use crate::device_camera::interface::Photo;
use crate::device_permission::interface::PermissionStatus;
use crate::image_classifier::interface::Prediction;

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Starting,
    Ready,
    Capturing,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum State {
    #[default]
    Idle,
    PermissionRequested,
    CameraActive {
        camera: CameraState,
    },
    Previewing {
        photo: Photo,
    },
    Classifying {
        photo: Photo,
    },
    ResultShown {
        photo: Photo,
        prediction: Prediction,
    },
}

/// The mutually exclusive flags the UI switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStatus {
    Idle,
    CameraReady,
    Previewing,
    Classifying,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub state: State,
    /// Blocks user actions until dismissed.
    pub alert: Option<Alert>,
    /// Capture cycle. Bumped each time the camera is (re)activated; results
    /// tagged with an older cycle are dropped.
    pub cycle: u64,
}

impl Model {
    pub fn status(&self) -> WorkflowStatus {
        match self.state {
            State::Idle | State::PermissionRequested => WorkflowStatus::Idle,
            State::CameraActive { .. } => WorkflowStatus::CameraReady,
            State::Previewing { .. } | State::ResultShown { .. } => WorkflowStatus::Previewing,
            State::Classifying { .. } => WorkflowStatus::Classifying,
        }
    }

    pub fn photo(&self) -> Option<&Photo> {
        match &self.state {
            State::Previewing { photo }
            | State::Classifying { photo }
            | State::ResultShown { photo, .. } => Some(photo),
            _ => None,
        }
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match &self.state {
            State::ResultShown { prediction, .. } => Some(prediction),
            _ => None,
        }
    }

    fn with_state(&self, state: State) -> Self {
        Self {
            state,
            alert: self.alert.clone(),
            cycle: self.cycle,
        }
    }

    fn with_alert(self, alert: Alert) -> Self {
        Self {
            alert: Some(alert),
            ..self
        }
    }

    fn next_cycle(self) -> Self {
        Self {
            cycle: self.cycle + 1,
            ..self
        }
    }
}

#[derive(Debug)]
pub enum Event {
    StartCameraPressed,
    ShutterPressed,
    ClassifyPressed,
    AlertDismissed,
    Quit,
    PermissionDone(Result<PermissionStatus, Box<dyn std::error::Error + Send + Sync>>),
    CameraActivateDone {
        cycle: u64,
        result: Result<(), Box<dyn std::error::Error + Send + Sync>>,
    },
    CaptureDone(Result<Photo, Box<dyn std::error::Error + Send + Sync>>),
    ClassifyDone {
        cycle: u64,
        result: Result<Prediction, ClassifyError>,
    },
}

impl Event {
    fn is_user_action(&self) -> bool {
        matches!(
            self,
            Event::StartCameraPressed | Event::ShutterPressed | Event::ClassifyPressed
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    RequestPermission,
    ActivateCamera { cycle: u64 },
    DeactivateCamera { cycle: u64 },
    CapturePhoto,
    Classify { photo: Photo, cycle: u64 },
}

pub fn init() -> (Model, Vec<Effect>) {
    (Model::default(), vec![])
}

pub fn transition(model: Model, event: Event) -> (Model, Vec<Effect>) {
    if model.alert.is_some() && event.is_user_action() {
        return (model, vec![]);
    }

    match (model.state.clone(), event) {
        (_, Event::AlertDismissed) => (
            Model {
                alert: None,
                ..model
            },
            vec![],
        ),

        // Permission
        (State::Idle, Event::StartCameraPressed) => {
            (model.with_state(State::PermissionRequested), vec![Effect::RequestPermission])
        }
        (State::PermissionRequested, Event::PermissionDone(Ok(PermissionStatus::Granted))) => {
            activate_camera(model)
        }
        (State::PermissionRequested, Event::PermissionDone(Ok(PermissionStatus::Denied))) => (
            model
                .with_state(State::Idle)
                .with_alert(Alert::new("Access denied", "Camera permission was not granted.")),
            vec![],
        ),
        (State::PermissionRequested, Event::PermissionDone(Err(e))) => (
            model
                .with_state(State::Idle)
                .with_alert(Alert::new("Camera unavailable", e.to_string())),
            vec![],
        ),

        // Retake from any screen past the camera discards the photo and result
        (State::PermissionRequested | State::CameraActive { .. }, Event::StartCameraPressed) => {
            (model, vec![])
        }
        (_, Event::StartCameraPressed) => activate_camera(model),

        // Camera
        (
            State::CameraActive {
                camera: CameraState::Starting,
            },
            Event::CameraActivateDone { cycle, result },
        ) if cycle == model.cycle => match result {
            Ok(()) => (
                model.with_state(State::CameraActive {
                    camera: CameraState::Ready,
                }),
                vec![],
            ),
            Err(e) => (
                model
                    .with_state(State::Idle)
                    .with_alert(Alert::new("Camera unavailable", e.to_string())),
                vec![Effect::DeactivateCamera { cycle }],
            ),
        },
        (
            State::CameraActive {
                camera: CameraState::Ready,
            },
            Event::ShutterPressed,
        ) => (
            model.with_state(State::CameraActive {
                camera: CameraState::Capturing,
            }),
            vec![Effect::CapturePhoto],
        ),
        (
            State::CameraActive {
                camera: CameraState::Capturing,
            },
            Event::CaptureDone(result),
        ) => match result {
            Ok(photo) => {
                let cycle = model.cycle;
                (
                    model.with_state(State::Previewing { photo }),
                    vec![Effect::DeactivateCamera { cycle }],
                )
            }
            Err(e) => (
                model
                    .with_state(State::CameraActive {
                        camera: CameraState::Ready,
                    })
                    .with_alert(Alert::new("Capture failed", e.to_string())),
                vec![],
            ),
        },

        // Classification; a shown result can be classified again
        (
            State::Previewing { photo } | State::ResultShown { photo, .. },
            Event::ClassifyPressed,
        ) => {
            let effect = Effect::Classify {
                photo: photo.clone(),
                cycle: model.cycle,
            };
            (model.with_state(State::Classifying { photo }), vec![effect])
        }
        (State::Classifying { photo }, Event::ClassifyDone { cycle, result })
            if cycle == model.cycle =>
        {
            match result {
                Ok(prediction) => (
                    model.with_state(State::ResultShown { photo, prediction }),
                    vec![],
                ),
                Err(e) => (
                    model
                        .with_state(State::Previewing { photo })
                        .with_alert(Alert::new("Classification failed", e.to_string())),
                    vec![],
                ),
            }
        }

        _ => (model, vec![]),
    }
}

fn activate_camera(model: Model) -> (Model, Vec<Effect>) {
    let model = Model {
        state: State::CameraActive {
            camera: CameraState::Starting,
        },
        alert: None,
        cycle: model.cycle,
    }
    .next_cycle();
    let cycle = model.cycle;
    (model, vec![Effect::ActivateCamera { cycle }])
}
