use capture_workflow::core::Event;
use capture_workflow::main::CaptureWorkflow;
use classify_pipeline::ClassifyPipeline;
use config::{ClassifierKind, Config, PermissionMode, UiKind};
use device_camera::impl_directory::DeviceCameraDirectory;
use device_camera::impl_fake::DeviceCameraFake;
use device_camera::interface::DeviceCamera;
use device_display::impl_console::{read_commands, DeviceDisplayConsole};
use device_display::impl_gui::DeviceDisplayGui;
use device_display::interface::DeviceDisplay;
use device_permission::impl_fake::DevicePermissionFake;
use device_permission::impl_video_node::DevicePermissionVideoNode;
use device_permission::interface::{DevicePermission, PermissionStatus};
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use image_classifier::interface::ImageClassifier;
use image_classifier::model_config::ModelConfig;
use image_resizer::impl_image::ImageResizerJpeg;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

mod capture_workflow;
mod classify_pipeline;
mod config;
mod device_camera;
mod device_display;
mod device_permission;
mod image_classifier;
mod image_resizer;
mod image_tensor;
mod library;

type WorkflowRunner = JoinHandle<Result<(), Box<dyn std::error::Error + Send + Sync>>>;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let device_permission: Arc<dyn DevicePermission + Send + Sync> = match config.permission {
        PermissionMode::Grant => Arc::new(DevicePermissionFake::new(
            PermissionStatus::Granted,
            logger.clone(),
        )),
        PermissionMode::Deny => Arc::new(DevicePermissionFake::new(
            PermissionStatus::Denied,
            logger.clone(),
        )),
        PermissionMode::Device => Arc::new(DevicePermissionVideoNode::new(
            config.video_device.clone(),
            logger.clone(),
        )),
    };

    let device_camera: Arc<dyn DeviceCamera + Send + Sync> = match &config.photos_dir {
        Some(dir) => Arc::new(DeviceCameraDirectory::new(dir.clone(), logger.clone())),
        None => Arc::new(DeviceCameraFake::new(
            config.capture_dir.clone(),
            logger.clone(),
        )),
    };

    let image_resizer = Arc::new(ImageResizerJpeg::new(config.jpeg_quality, logger.clone()));

    let image_classifier: Arc<dyn ImageClassifier + Send + Sync> = match config.classifier {
        ClassifierKind::Fake => Arc::new(ImageClassifierFake::new(logger.clone())),
        ClassifierKind::Onnx => Arc::new(ImageClassifierTractOnnx::new(
            ModelConfig::from(&config),
            logger.clone(),
        )),
    };

    let classify_pipeline = Arc::new(ClassifyPipeline::new(
        &config,
        image_resizer,
        image_classifier,
        logger.clone(),
    ));

    let start = |device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>| {
        let workflow = Arc::new(CaptureWorkflow::new(
            logger.clone(),
            device_permission.clone(),
            device_camera.clone(),
            device_display,
            classify_pipeline.clone(),
        ));
        let event_sender = workflow.event_sender();
        let runner: WorkflowRunner = std::thread::spawn(move || workflow.run());
        (event_sender, runner)
    };

    match config.ui {
        UiKind::Console => {
            let device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> =
                Arc::new(Mutex::new(DeviceDisplayConsole::new()));
            let (event_sender, runner) = start(device_display);
            read_commands(std::io::stdin().lock(), &event_sender)?;
            join(runner)
        }
        UiKind::Gui => {
            let gui = DeviceDisplayGui::new(logger.clone());
            let device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> =
                Arc::new(Mutex::new(gui.handle()));
            let (event_sender, runner) = start(device_display);
            let closed = gui.run_window(event_sender.clone());
            let _ = event_sender.send(Event::Quit);
            join(runner)?;
            closed
        }
    }
}

fn join(runner: WorkflowRunner) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    runner
        .join()
        .map_err(|_| "workflow thread panicked")?
}
