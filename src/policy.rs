//! Decides which questions are shown and which answer "not found".

use chrono::{DateTime, Duration, offset::Utc};

pub type Timestamp = DateTime<Utc>;

/// Anything carrying a publish date and a choice set.
pub trait PollQuestion {
    fn pub_date(&self) -> Timestamp;
    fn choice_count(&self) -> usize;
}

/// True iff `pub_date` lies in `(now - 1 day, now]`.
pub fn is_recently_published(now: Timestamp, pub_date: Timestamp) -> bool {
    is_published(now, pub_date) && now - pub_date < Duration::days(1)
}

pub fn is_published(now: Timestamp, pub_date: Timestamp) -> bool {
    pub_date <= now
}

/// Eligible for the index page.
pub fn is_listable(now: Timestamp, question: &impl PollQuestion) -> bool {
    is_published(now, question.pub_date()) && question.choice_count() > 0
}

/// Eligible for the detail, results and vote pages.
pub fn is_viewable(now: Timestamp, question: &impl PollQuestion) -> bool {
    is_listable(now, question)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    struct MockQuestion {
        pub_date: Timestamp,
        choices: usize,
    }

    impl PollQuestion for MockQuestion {
        fn pub_date(&self) -> Timestamp {
            self.pub_date
        }

        fn choice_count(&self) -> usize {
            self.choices
        }
    }

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2021, 3, 14, 12, 0, 0).unwrap()
    }

    mod recently_published {
        use super::*;

        #[test]
        fn future_question() {
            let pub_date = now() + Duration::days(30);
            assert!(!is_recently_published(now(), pub_date));
        }

        #[test]
        fn one_second_in_the_future() {
            let pub_date = now() + Duration::seconds(1);
            assert!(!is_recently_published(now(), pub_date));
        }

        #[test]
        fn old_question() {
            let pub_date = now() - Duration::days(1) - Duration::seconds(1);
            assert!(!is_recently_published(now(), pub_date));
        }

        #[test]
        fn exactly_one_day_old() {
            let pub_date = now() - Duration::days(1);
            assert!(!is_recently_published(now(), pub_date));
        }

        #[test]
        fn recent_question() {
            let pub_date = now() - Duration::hours(23) - Duration::minutes(59) - Duration::seconds(59);
            assert!(is_recently_published(now(), pub_date));
        }

        #[test]
        fn published_right_now() {
            assert!(is_recently_published(now(), now()));
        }
    }

    #[test]
    fn listable_needs_past_date_and_choices() {
        let past_with_choice = MockQuestion { pub_date: now() - Duration::days(30), choices: 1 };
        let past_no_choice = MockQuestion { pub_date: now() - Duration::days(30), choices: 0 };
        let future_with_choice = MockQuestion { pub_date: now() + Duration::days(30), choices: 2 };

        assert!(is_listable(now(), &past_with_choice));
        assert!(!is_listable(now(), &past_no_choice));
        assert!(!is_listable(now(), &future_with_choice));
    }

    #[test]
    fn viewable_needs_past_date_and_choices() {
        let past_with_choice = MockQuestion { pub_date: now() - Duration::days(5), choices: 3 };
        let past_no_choice = MockQuestion { pub_date: now() - Duration::days(5), choices: 0 };
        let future_with_choice = MockQuestion { pub_date: now() + Duration::days(5), choices: 1 };
        let future_no_choice = MockQuestion { pub_date: now() + Duration::days(5), choices: 0 };

        assert!(is_viewable(now(), &past_with_choice));
        assert!(!is_viewable(now(), &past_no_choice));
        assert!(!is_viewable(now(), &future_with_choice));
        assert!(!is_viewable(now(), &future_no_choice));
    }

    #[test]
    fn listable_and_viewable_agree() {
        for days in [-30, -1, 0, 1, 30] {
            for choices in [0, 1, 4] {
                let question = MockQuestion { pub_date: now() + Duration::days(days), choices };
                assert_eq!(
                    is_listable(now(), &question),
                    is_viewable(now(), &question),
                    "days={} choices={}", days, choices
                );
            }
        }
    }

    #[test]
    fn published_at_now_is_viewable() {
        let question = MockQuestion { pub_date: now(), choices: 1 };
        assert!(is_viewable(now(), &question));
    }
}
