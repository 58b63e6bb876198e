use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Recorded traces write `0,0` when no fix was available.
    pub fn from_fix(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude == 0.0 && longitude == 0.0 {
            None
        } else {
            Some(Self::new(latitude, longitude))
        }
    }
}

#[derive(Debug)]
pub struct LocationPublisher {
    tx: watch::Sender<Option<Coordinates>>,
}

#[derive(Debug, Clone)]
pub struct LocationReader {
    rx: watch::Receiver<Option<Coordinates>>,
}

pub fn location_feed() -> (LocationPublisher, LocationReader) {
    let (tx, rx) = watch::channel(None);
    (LocationPublisher { tx }, LocationReader { rx })
}

impl LocationPublisher {
    pub fn publish(&self, coordinates: Coordinates) {
        // send_replace keeps the value even when every reader is gone.
        self.tx.send_replace(Some(coordinates));
    }

    pub fn reader(&self) -> LocationReader {
        LocationReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl LocationReader {
    /// No fix at all: a reader detached from any publisher.
    pub fn none() -> Self {
        let (_tx, rx) = watch::channel(None);
        Self { rx }
    }

    pub fn snapshot(&self) -> Option<Coordinates> {
        *self.rx.borrow()
    }
}
