//! Error banner state
//!
//! One banner, auto-hidden after a fixed duration. Showing a new message
//! replaces the old one and invalidates its pending timer, so at most one
//! expiry is ever live. The timer itself is a task owned by the app loop;
//! this type only arbitrates which expiry still counts.

/// How long a banner stays visible, in milliseconds.
pub const NOTICE_DURATION_MS: u64 = 5000;

#[derive(Debug, Default)]
pub struct Banner {
    message: Option<String>,
    generation: u64,
}

impl Banner {
    /// The currently visible message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Show `message`, replacing whatever was visible. Returns the
    /// generation the caller must hand back with the matching expiry.
    pub fn show(&mut self, message: impl Into<String>) -> u64 {
        self.generation += 1;
        self.message = Some(message.into());
        self.generation
    }

    /// Hide the banner if `generation` is still current; expiries from
    /// replaced timers are ignored.
    pub fn expire(&mut self, generation: u64) {
        if generation == self.generation {
            self.message = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_with_the_current_generation_hides_the_banner() {
        let mut banner = Banner::default();
        let generation = banner.show("oops");
        assert_eq!(banner.message(), Some("oops"));
        banner.expire(generation);
        assert_eq!(banner.message(), None);
    }

    #[test]
    fn showing_again_invalidates_the_previous_timer() {
        let mut banner = Banner::default();
        let first = banner.show("first");
        let second = banner.show("second");

        banner.expire(first);
        assert_eq!(banner.message(), Some("second"));

        banner.expire(second);
        assert_eq!(banner.message(), None);
    }
}
