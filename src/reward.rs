/// Notification that the host should credit blood points.
///
/// Invoked synchronously, at most once per qualifying event. The engine
/// ignores whatever the host does with it.
pub trait RewardCallback {
    fn reward(&mut self);
}

impl<F: FnMut()> RewardCallback for F {
    fn reward(&mut self) {
        self()
    }
}

/// Callback used until the host installs its own
pub struct NoReward;

impl RewardCallback for NoReward {
    fn reward(&mut self) {}
}
