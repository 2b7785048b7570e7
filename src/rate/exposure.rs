//! 异质暴露模型
//!
//! 离散时间下，群组中的每个易感成员每一步独立抽取参与时间 `tau` 与剂量：
//! - `tau` 服从 `[1, T]` 上指数为 `alpha` 的截断幂律分布；
//! - 剂量为 `-beta * tau * rho * ln(1 - r)`，`rho = i / (n - 1)` 为其余成员中的感染比例。
//!
//! 剂量超过阈值 `K` 即被感染。

use rand::Rng;

use super::model::check_rate;
use crate::error::{Result, SchonError};

/// `infection_probability` 的 Simpson 积分区间数（偶数）
const QUADRATURE_INTERVALS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeterogeneousExposure {
    pub alpha: f64,
    pub max_participation_time: f64,
    pub beta: f64,
    pub dose_threshold: f64,
}

impl HeterogeneousExposure {
    pub fn new(
        alpha: f64,
        max_participation_time: f64,
        beta: f64,
        dose_threshold: f64,
    ) -> Result<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(SchonError::InvalidRate {
                what: "alpha".to_string(),
                value: alpha,
            });
        }
        if !max_participation_time.is_finite() || max_participation_time < 1.0 {
            return Err(SchonError::InvalidRate {
                what: "max_participation_time (must be >= 1)".to_string(),
                value: max_participation_time,
            });
        }
        check_rate("beta", beta)?;
        if !dose_threshold.is_finite() {
            return Err(SchonError::InvalidRate {
                what: "dose_threshold".to_string(),
                value: dose_threshold,
            });
        }
        Ok(Self {
            alpha,
            max_participation_time,
            beta,
            dose_threshold,
        })
    }

    /// 大小为 `n`、含 `i` 个感染者的群组中，易感成员面对的感染比例
    pub fn exposed_fraction(n: usize, i: usize) -> f64 {
        if n < 2 {
            0.0
        } else {
            i as f64 / (n - 1) as f64
        }
    }

    /// `T^-alpha`：参与时间变换后均匀变量的下端点
    fn tail(&self) -> f64 {
        self.max_participation_time.powf(-self.alpha)
    }

    /// 抽取一次参与时间
    pub fn draw_participation_time<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let r: f64 = rng.gen_range(0.0..1.0);
        let u = 1.0 - r * (1.0 - self.tail());
        u.powf(-1.0 / self.alpha)
    }

    /// 在一个群组中的一次暴露试验：抽取参与时间与剂量，剂量超过阈值时返回 true
    pub fn exposed<R: Rng + ?Sized>(&self, n: usize, i: usize, rng: &mut R) -> bool {
        let rho = Self::exposed_fraction(n, i);
        let tau = self.draw_participation_time(rng);
        let r: f64 = rng.gen_range(0.0..1.0);
        let dose = -self.beta * tau * rho * (1.0 - r).ln();
        dose > self.dose_threshold
    }

    /// 一次暴露试验导致感染的概率。
    ///
    /// 给定 `tau`，剂量超过 `K` 的概率为 `exp(-K / (beta * rho * tau))`；
    /// 令 `u = tau^-alpha` 后 `u` 在 `[T^-alpha, 1]` 上均匀，按 `u` 做 Simpson 积分。
    pub fn infection_probability(&self, n: usize, i: usize) -> f64 {
        let scale = self.beta * Self::exposed_fraction(n, i);
        let k = self.dose_threshold;
        if k < 0.0 {
            return 1.0;
        }
        if scale <= 0.0 {
            return 0.0;
        }
        let given_u = |u: f64| (-k / scale * u.powf(1.0 / self.alpha)).exp();

        let lo = self.tail();
        let width = 1.0 - lo;
        if width <= f64::EPSILON {
            return given_u(1.0);
        }
        let h = width / QUADRATURE_INTERVALS as f64;
        let mut sum = given_u(lo) + given_u(1.0);
        for j in 1..QUADRATURE_INTERVALS {
            let weight = if j % 2 == 1 { 4.0 } else { 2.0 };
            sum += weight * given_u(lo + j as f64 * h);
        }
        (sum * h / 3.0 / width).clamp(0.0, 1.0)
    }
}
