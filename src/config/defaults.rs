use std::time::Duration;

pub(super) const fn default_entrance_delay() -> Duration {
    Duration::from_millis(16)
}

pub(super) const fn default_auto_dismiss() -> Duration {
    Duration::from_millis(5_000)
}

pub(super) const fn default_outside_click_grace() -> Duration {
    Duration::from_millis(500)
}

pub(super) const fn default_exit_animation() -> Duration {
    Duration::from_millis(300)
}

pub(super) const fn default_submit_delay() -> Duration {
    Duration::from_millis(1_200)
}

pub(super) const fn default_interaction_capacity() -> usize {
    64
}

pub(super) const fn default_header_height() -> f64 {
    80.0
}

pub(super) const fn default_header_hide_after() -> f64 {
    100.0
}

pub(super) const fn default_section_offset() -> f64 {
    150.0
}
