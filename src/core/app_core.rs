use super::page::Page;
use super::ticker::Ticker;
use crate::clock::Clock;
use crate::config::Config;
use crate::widgets::{MidnightCountdown, Notice};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Which target elements the page offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFeatures {
    pub countdown: bool,
    pub notice: bool,
}

impl Default for PageFeatures {
    fn default() -> Self {
        Self {
            countdown: true,
            notice: true,
        }
    }
}

/// Core application state (frontend-agnostic)
///
/// Owns the page and writes the countdown and notice into it. Frontends only
/// read the page back.
pub struct AppCore {
    /// Application configuration
    pub config: Config,

    /// Target elements
    pub page: Page,

    /// Application running flag
    pub running: bool,

    /// Set whenever page content changed since the last render
    pub needs_render: bool,

    clock: Rc<dyn Clock>,
    countdown: MidnightCountdown,
    notice: Notice,

    /// Started by `on_load` only when the countdown element exists
    ticker: Option<Ticker>,
}

impl AppCore {
    #[cfg(test)]
    pub fn new(config: Config, clock: Rc<dyn Clock>) -> Self {
        Self::with_features(config, clock, PageFeatures::default())
    }

    /// Build a page that only contains the enabled elements
    pub fn with_features(config: Config, clock: Rc<dyn Clock>, features: PageFeatures) -> Self {
        let ids = [
            (features.countdown, config.elements.countdown_id.as_str()),
            (features.notice, config.elements.notice_id.as_str()),
        ];
        let page = Page::with_elements(
            ids.into_iter()
                .filter(|(enabled, id)| *enabled && !id.is_empty())
                .map(|(_, id)| id),
        );
        Self::with_page(config, clock, page)
    }

    pub fn with_page(config: Config, clock: Rc<dyn Clock>, page: Page) -> Self {
        let countdown = MidnightCountdown::new(
            &config.countdown.template,
            config.countdown.zero_text.as_deref(),
        );
        let notice = Notice::new(&config.notice.template);

        Self {
            config,
            page,
            running: true,
            needs_render: true,
            clock,
            countdown,
            notice,
            ticker: None,
        }
    }

    /// Page-load handler: start the countdown if its element exists and write
    /// the notice once if its element exists.
    pub fn on_load(&mut self, now: Instant) {
        if self.page.contains(&self.config.elements.countdown_id) {
            let mut ticker = Ticker::new(Duration::from_millis(
                self.config.countdown.tick_interval_ms.max(1),
            ));
            ticker.mark(now);
            tracing::info!(
                "Countdown started on '{}' every {:?}",
                self.config.elements.countdown_id,
                ticker.period()
            );
            self.ticker = Some(ticker);
            self.refresh_countdown();
        } else {
            tracing::debug!(
                "No '{}' element, countdown skipped",
                self.config.elements.countdown_id
            );
        }

        let notice_id = self.config.elements.notice_id.clone();
        match self.page.element_mut(&notice_id) {
            Some(element) => {
                let markup = self.notice.render(self.clock.as_ref());
                tracing::debug!("Notice written to '{}': {}", notice_id, markup);
                self.needs_render |= element.set_markup(markup);
            }
            None => tracing::debug!("No '{}' element, notice skipped", notice_id),
        }
    }

    /// Run the countdown update if a tick is due.
    /// Returns true when the page changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due = match self.ticker.as_mut() {
            Some(ticker) => ticker.poll(now),
            None => false,
        };
        due && self.refresh_countdown()
    }

    /// Recompute the countdown text. Returns true when it changed.
    pub fn refresh_countdown(&mut self) -> bool {
        let text = self.countdown.render(self.clock.as_ref());
        let Some(element) = self.page.element_mut(&self.config.elements.countdown_id) else {
            return false;
        };
        let changed = element.set_text(text);
        if changed {
            tracing::trace!("Countdown: {}", element.as_str());
        }
        self.needs_render |= changed;
        changed
    }

    /// How long an event loop may block before the next tick
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.ticker.as_ref().map(|t| t.until_next(now))
    }

    #[cfg(test)]
    pub fn ticker(&self) -> Option<&Ticker> {
        self.ticker.as_ref()
    }

    pub fn countdown_text(&self) -> Option<&str> {
        self.page
            .element(&self.config.elements.countdown_id)
            .map(|e| e.as_str())
    }

    pub fn notice_markup(&self) -> Option<&str> {
        self.page
            .element(&self.config.elements.notice_id)
            .map(|e| e.as_str())
    }

    /// Seconds left until midnight at the current clock reading
    pub fn remaining_seconds(&self) -> i64 {
        crate::widgets::countdown::remaining_until_midnight(&self.clock.now()).num_seconds()
    }

    pub fn quit(&mut self) {
        tracing::info!("Quit requested");
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::core::page::ElementContent;
    use chrono::{Local, TimeDelta, TimeZone};

    fn clock_at(h: u32, m: u32, s: u32) -> Rc<FixedClock> {
        Rc::new(FixedClock::new(
            Local.with_ymd_and_hms(2025, 1, 31, h, m, s).unwrap(),
        ))
    }

    #[test]
    fn test_on_load_writes_both_elements() {
        let clock = clock_at(23, 59, 58);
        let mut app = AppCore::new(Config::default(), clock);
        app.on_load(Instant::now());

        assert_eq!(app.countdown_text(), Some("Time left: 00h 00m 02s"));
        assert_eq!(
            app.notice_markup(),
            Some("Offer valid until <strong>01/02</strong>.")
        );
        assert!(matches!(
            app.page.element("newsDescription").unwrap().content(),
            ElementContent::Markup(_)
        ));
        assert!(matches!(
            app.page.element("countdown").unwrap().content(),
            ElementContent::Text(_)
        ));
        assert!(app.ticker().is_some());
    }

    #[test]
    fn test_absent_countdown_skips_ticker() {
        let clock = clock_at(12, 0, 0);
        let features = PageFeatures {
            countdown: false,
            notice: true,
        };
        let mut app = AppCore::with_features(Config::default(), clock, features);
        let t0 = Instant::now();
        app.on_load(t0);

        assert!(app.ticker().is_none());
        assert_eq!(app.countdown_text(), None);
        assert!(app.notice_markup().is_some());
        assert!(!app.tick(t0 + Duration::from_secs(5)));
        assert_eq!(app.until_next_tick(t0), None);
    }

    #[test]
    fn test_absent_notice_is_skipped() {
        let clock = clock_at(12, 0, 0);
        let features = PageFeatures {
            countdown: true,
            notice: false,
        };
        let mut app = AppCore::with_features(Config::default(), clock, features);
        app.on_load(Instant::now());

        assert_eq!(app.notice_markup(), None);
        assert_eq!(app.countdown_text(), Some("Time left: 12h 00m 00s"));
    }

    #[test]
    fn test_tick_follows_clock_and_period() {
        let clock = clock_at(23, 59, 57);
        let mut app = AppCore::new(Config::default(), clock.clone());
        let t0 = Instant::now();
        app.on_load(t0);
        assert_eq!(app.countdown_text(), Some("Time left: 00h 00m 03s"));

        clock.advance(TimeDelta::seconds(1));
        // Not due yet: text stays put even though the clock moved
        assert!(!app.tick(t0 + Duration::from_millis(500)));
        assert_eq!(app.countdown_text(), Some("Time left: 00h 00m 03s"));

        assert!(app.tick(t0 + Duration::from_millis(1000)));
        assert_eq!(app.countdown_text(), Some("Time left: 00h 00m 02s"));

        clock.advance(TimeDelta::seconds(2));
        assert!(app.tick(t0 + Duration::from_millis(2000)));
        assert_eq!(app.countdown_text(), Some("Time left: 00h 00m 00s"));
        assert_eq!(app.remaining_seconds(), 0);
    }

    #[test]
    fn test_late_polls_keep_one_second_phase() {
        let clock = clock_at(23, 59, 50);
        let mut app = AppCore::new(Config::default(), clock.clone());
        let t0 = Instant::now();
        app.on_load(t0);

        clock.advance(TimeDelta::seconds(1));
        assert!(app.tick(t0 + Duration::from_millis(1005)));
        assert_eq!(app.countdown_text(), Some("Time left: 00h 00m 09s"));
        assert_eq!(
            app.until_next_tick(t0 + Duration::from_millis(1005)),
            Some(Duration::from_millis(995))
        );

        clock.advance(TimeDelta::seconds(1));
        assert!(!app.tick(t0 + Duration::from_millis(1999)));
        assert!(app.tick(t0 + Duration::from_millis(2000)));
        assert_eq!(app.countdown_text(), Some("Time left: 00h 00m 08s"));
    }

    #[test]
    fn test_unchanged_text_does_not_request_render() {
        let clock = clock_at(10, 0, 0);
        let mut app = AppCore::new(Config::default(), clock);
        let t0 = Instant::now();
        app.on_load(t0);
        app.needs_render = false;

        // Frozen clock: tick runs but nothing changes
        assert!(!app.tick(t0 + Duration::from_secs(1)));
        assert!(!app.needs_render);
        assert_eq!(app.ticker().unwrap().ticks(), 2);
    }

    #[test]
    fn test_custom_ids_and_templates() {
        let mut config = Config::default();
        config.elements.countdown_id = "timer".to_string();
        config.elements.notice_id = "banner".to_string();
        config.countdown.template = "{hh}:{mm}:{ss}".to_string();
        config.countdown.zero_text = Some("closed".to_string());
        config.notice.template = "<b>{day}</b>".to_string();

        let clock = clock_at(23, 30, 0);
        let mut app = AppCore::new(config, clock.clone());
        app.on_load(Instant::now());
        assert_eq!(app.page.element("timer").unwrap().as_str(), "00:30:00");
        assert_eq!(app.page.element("banner").unwrap().as_str(), "<b>01</b>");

        clock.set(Local.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());
        app.refresh_countdown();
        assert_eq!(app.countdown_text(), Some("closed"));
    }

    #[test]
    fn test_quit_clears_running() {
        let mut app = AppCore::new(Config::default(), clock_at(1, 0, 0));
        assert!(app.running);
        app.quit();
        assert!(!app.running);
    }
}
