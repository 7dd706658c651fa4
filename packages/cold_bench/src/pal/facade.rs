use std::fmt::Debug;
use std::time::Instant;

#[cfg(test)]
use crate::pal::MockTimeSource;
use crate::pal::{RealTimeSource, TimeSource};
#[cfg(test)]
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) enum TimeSourceFacade {
    Real(RealTimeSource),

    #[cfg(test)]
    Mock(Arc<Mutex<MockTimeSource>>),
}

impl TimeSourceFacade {
    pub(crate) fn real() -> Self {
        Self::Real(RealTimeSource)
    }
}

impl From<RealTimeSource> for TimeSourceFacade {
    fn from(ts: RealTimeSource) -> Self {
        Self::Real(ts)
    }
}

#[cfg(test)]
impl From<MockTimeSource> for TimeSourceFacade {
    fn from(ts: MockTimeSource) -> Self {
        Self::Mock(Arc::new(Mutex::new(ts)))
    }
}

impl TimeSource for TimeSourceFacade {
    fn now(&mut self) -> Instant {
        match self {
            Self::Real(ts) => ts.now(),
            #[cfg(test)]
            Self::Mock(ts) => ts
                .lock()
                .expect("mock time source does not support operation after panic in mock")
                .now(),
        }
    }
}

impl Debug for TimeSourceFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real(ts) => ts.fmt(f),
            #[cfg(test)]
            Self::Mock(ts) => ts.fmt(f),
        }
    }
}
