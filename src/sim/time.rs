//! 仿真时钟
//!
//! 连续时间模型使用实数时间；离散时间模型使用整数步计数。

/// 仿真时钟
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clock {
    Continuous(f64),
    Discrete(u64),
}

impl Clock {
    pub fn zero(discrete: bool) -> Clock {
        if discrete {
            Clock::Discrete(0)
        } else {
            Clock::Continuous(0.0)
        }
    }

    /// 以实数表示的当前时间
    pub fn now(&self) -> f64 {
        match *self {
            Clock::Continuous(t) => t,
            Clock::Discrete(ticks) => ticks as f64,
        }
    }

    pub fn is_discrete(&self) -> bool {
        matches!(self, Clock::Discrete(_))
    }

    /// 连续时钟直接跳到 `t`（不允许倒退）
    pub(crate) fn set(&mut self, t: f64) {
        if let Clock::Continuous(now) = self {
            debug_assert!(t >= *now, "clock moving backwards: {now} -> {t}");
            *now = t;
        }
    }

    /// 离散时钟前进一步
    pub(crate) fn tick(&mut self) {
        if let Clock::Discrete(ticks) = self {
            *ticks = ticks.saturating_add(1);
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Clock::zero(self.is_discrete());
    }
}
