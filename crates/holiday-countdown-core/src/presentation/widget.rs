//! Maps refresh events onto a host-provided countdown widget.

use std::sync::{Mutex, PoisonError};

use tracing::error;

use crate::models::NearestHoliday;
use crate::refresh::RefreshEvent;

use super::Reporter;

/// Title shown until holiday data is available.
pub const LOADING_TITLE: &str = "Loading holidays...";

/// Content shown until holiday data is available.
pub const LOADING_CONTENT: &str = "0 days";

/// Holidays closer than this many days get the urgent icon.
pub const URGENT_THRESHOLD_DAYS: i64 = 2;

/// Icons the widget can show next to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    /// Neutral marker shown while loading.
    Loading,
    /// The holiday is a day or less away.
    Urgent,
}

/// Display capability provided by the host widget.
pub trait WidgetDisplay {
    fn display(&mut self, title: &str, content: &str);
    fn set_icon(&mut self, icon: IconKind);
    fn set_icon_visible(&mut self, visible: bool);
}

/// Translates `RefreshEvent`s into widget updates.
pub struct WidgetPresenter<D> {
    display: D,
}

impl<D: WidgetDisplay> WidgetPresenter<D> {
    pub fn new(display: D) -> Self {
        Self { display }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_inner(self) -> D {
        self.display
    }

    /// Apply one event. Failures are only logged.
    pub fn apply(&mut self, event: &RefreshEvent) {
        match event {
            RefreshEvent::Updated(nearest) => self.show(nearest.as_ref()),
            RefreshEvent::Failed { error, retry_in } => {
                error!(error = %error, retry_in = ?retry_in, "Holiday refresh failed");
            }
        }
    }

    /// Render a countdown, or the loading state when there is nothing to show.
    pub fn show(&mut self, nearest: Option<&NearestHoliday>) {
        self.display.set_icon_visible(false);

        let Some(holiday) = nearest else {
            self.display.display(LOADING_TITLE, LOADING_CONTENT);
            self.display.set_icon(IconKind::Loading);
            self.display.set_icon_visible(true);
            return;
        };

        let title = format!("Until {}", holiday.name);
        let content = format!("{} days", holiday.days_left);
        self.display.display(&title, &content);
        if holiday.days_left < URGENT_THRESHOLD_DAYS {
            self.display.set_icon(IconKind::Urgent);
            self.display.set_icon_visible(true);
        }
    }
}

/// Lets a presenter receive events directly from the service's worker.
impl<D: WidgetDisplay + Send> Reporter for Mutex<WidgetPresenter<D>> {
    fn report(&self, event: RefreshEvent) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(&event);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::refresh::RefreshError;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Display(String, String),
        Icon(IconKind),
        IconVisible(bool),
    }

    #[derive(Default)]
    struct RecordingDisplay {
        calls: Vec<Call>,
    }

    impl WidgetDisplay for RecordingDisplay {
        fn display(&mut self, title: &str, content: &str) {
            self.calls
                .push(Call::Display(title.to_string(), content.to_string()));
        }

        fn set_icon(&mut self, icon: IconKind) {
            self.calls.push(Call::Icon(icon));
        }

        fn set_icon_visible(&mut self, visible: bool) {
            self.calls.push(Call::IconVisible(visible));
        }
    }

    fn holiday(days_left: i64) -> NearestHoliday {
        NearestHoliday {
            name: "国庆节".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            days_left,
        }
    }

    #[test]
    fn test_empty_result_shows_loading() {
        let mut presenter = WidgetPresenter::new(RecordingDisplay::default());
        presenter.apply(&RefreshEvent::Updated(None));

        assert_eq!(
            presenter.into_inner().calls,
            vec![
                Call::IconVisible(false),
                Call::Display(LOADING_TITLE.to_string(), LOADING_CONTENT.to_string()),
                Call::Icon(IconKind::Loading),
                Call::IconVisible(true),
            ]
        );
    }

    #[test]
    fn test_distant_holiday_hides_icon() {
        let mut presenter = WidgetPresenter::new(RecordingDisplay::default());
        presenter.apply(&RefreshEvent::Updated(Some(holiday(6))));

        assert_eq!(
            presenter.into_inner().calls,
            vec![
                Call::IconVisible(false),
                Call::Display("Until 国庆节".to_string(), "6 days".to_string()),
            ]
        );
    }

    #[test]
    fn test_imminent_holiday_shows_urgent_icon() {
        for days_left in [0, 1] {
            let mut presenter = WidgetPresenter::new(RecordingDisplay::default());
            presenter.apply(&RefreshEvent::Updated(Some(holiday(days_left))));

            let calls = presenter.into_inner().calls;
            assert_eq!(calls.len(), 4);
            assert_eq!(calls[2], Call::Icon(IconKind::Urgent));
            assert_eq!(calls[3], Call::IconVisible(true));
        }

        let mut presenter = WidgetPresenter::new(RecordingDisplay::default());
        presenter.apply(&RefreshEvent::Updated(Some(holiday(2))));
        assert!(!presenter
            .display()
            .calls
            .contains(&Call::Icon(IconKind::Urgent)));
    }

    #[test]
    fn test_failure_leaves_display_untouched() {
        let mut presenter = WidgetPresenter::new(RecordingDisplay::default());
        presenter.apply(&RefreshEvent::Updated(None));
        let before = presenter.display().calls.clone();

        presenter.apply(&RefreshEvent::Failed {
            error: Arc::new(RefreshError::Fetch {
                year: 2026,
                source: ApiError::RateLimited,
            }),
            retry_in: Some(Duration::from_secs(60)),
        });

        assert_eq!(presenter.display().calls, before);
    }

    #[test]
    fn test_mutex_presenter_as_reporter() {
        let presenter = Mutex::new(WidgetPresenter::new(RecordingDisplay::default()));
        let reporter: &dyn Reporter = &presenter;
        reporter.report(RefreshEvent::Updated(Some(holiday(10))));

        let display = presenter.into_inner().unwrap().into_inner();
        assert_eq!(
            display.calls.last(),
            Some(&Call::Display("Until 国庆节".to_string(), "10 days".to_string()))
        );
    }
}
