use log::{debug, error};
use serenity::model::id::UserId;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding window rate limit, at most `rate` uses per `per` for each user.
#[derive(Debug)]
pub struct Cooldown {
    rate: usize,
    per: Duration,
    uses: Mutex<BTreeMap<UserId, VecDeque<Instant>>>,
}

impl Cooldown {
    pub fn new(rate: usize, per: Duration) -> Cooldown {
        Cooldown {
            rate,
            per,
            uses: Mutex::new(BTreeMap::new()),
        }
    }

    /// Records a use by `user` at `now`. When the user is over the limit
    /// nothing is recorded and the time until the next allowed use is
    /// returned instead.
    pub fn check(&self, user: UserId, now: Instant) -> Result<(), Duration> {
        let mut uses = match self.uses.lock() {
            Ok(uses) => uses,
            Err(poisoned) => {
                error!("cooldown lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };

        let window = uses.entry(user).or_insert_with(VecDeque::new);
        while window
            .front()
            .map_or(false, |used| now.saturating_duration_since(*used) >= self.per)
        {
            window.pop_front();
        }

        if window.len() >= self.rate {
            let oldest = window.front().copied().unwrap_or(now);
            let retry_after = self.per - now.saturating_duration_since(oldest);
            debug!("user {user} is on cooldown for another {retry_after:?}");
            return Err(retry_after);
        }

        window.push_back(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_rate() {
        let cooldown = Cooldown::new(2, Duration::from_secs(30));
        let now = Instant::now();
        assert!(cooldown.check(UserId(1), now).is_ok());
        assert!(cooldown.check(UserId(1), now + Duration::from_secs(1)).is_ok());
        assert_eq!(
            cooldown.check(UserId(1), now + Duration::from_secs(10)),
            Err(Duration::from_secs(20))
        );
    }

    #[test]
    fn test_users_are_independent() {
        let cooldown = Cooldown::new(2, Duration::from_secs(30));
        let now = Instant::now();
        assert!(cooldown.check(UserId(1), now).is_ok());
        assert!(cooldown.check(UserId(1), now).is_ok());
        assert!(cooldown.check(UserId(2), now).is_ok());
    }

    #[test]
    fn test_window_slides() {
        let cooldown = Cooldown::new(2, Duration::from_secs(30));
        let now = Instant::now();
        assert!(cooldown.check(UserId(1), now).is_ok());
        assert!(cooldown.check(UserId(1), now + Duration::from_secs(20)).is_ok());
        assert!(cooldown.check(UserId(1), now + Duration::from_secs(29)).is_err());
        // first use expired, second is still in the window
        assert!(cooldown.check(UserId(1), now + Duration::from_secs(30)).is_ok());
        assert!(cooldown.check(UserId(1), now + Duration::from_secs(31)).is_err());
    }

    #[test]
    fn test_rejected_use_is_not_recorded() {
        let cooldown = Cooldown::new(1, Duration::from_secs(30));
        let now = Instant::now();
        assert!(cooldown.check(UserId(1), now).is_ok());
        for secs in 1..10 {
            assert!(cooldown.check(UserId(1), now + Duration::from_secs(secs)).is_err());
        }
        assert!(cooldown.check(UserId(1), now + Duration::from_secs(30)).is_ok());
    }
}
