use crate::device_display::interface::{DeviceDisplay, ScreenView};
use crate::library::logger::interface::Logger;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Records every view it is asked to show. Clones share the record.
#[derive(Clone)]
pub struct DeviceDisplayFake {
    views: Arc<Mutex<Vec<ScreenView>>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceDisplayFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            views: Arc::new(Mutex::new(Vec::new())),
            logger: logger.with_namespace("display").with_namespace("fake"),
        }
    }

    pub fn views(&self) -> Vec<ScreenView> {
        self.views
            .lock()
            .map(|views| views.clone())
            .unwrap_or_default()
    }

    pub fn last_view(&self) -> Option<ScreenView> {
        self.views().pop()
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn show(&mut self, view: &ScreenView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger
            .info(&format!("DeviceDisplayFake::show({:?})", view))?;
        self.views
            .lock()
            .map_err(|_| "display record lock poisoned")?
            .push(view.clone());
        Ok(())
    }
}
