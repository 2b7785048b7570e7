//! 测量注册表

use super::{Measure, MeasureResult};
use crate::pop::Population;

#[derive(Debug, Default)]
pub struct MeasureRegistry {
    measures: Vec<Box<dyn Measure>>,
}

impl MeasureRegistry {
    /// 按名字幂等注册：同名测量已存在时丢弃 `measure` 并返回 false
    pub fn register(&mut self, measure: Box<dyn Measure>) -> bool {
        if self.get(measure.name()).is_some() {
            return false;
        }
        self.measures.push(measure);
        true
    }

    pub fn get(&self, name: &str) -> Option<&dyn Measure> {
        self.measures
            .iter()
            .find(|m| m.name() == name)
            .map(|m| &**m)
    }

    /// 按名字取结果
    pub fn result(&self, name: &str) -> Option<MeasureResult> {
        self.get(name).map(|m| m.result())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Box<dyn Measure>> {
        self.measures.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.measures.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.measures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    pub(crate) fn update_all(&mut self, population: &Population, time: f64) {
        for m in &mut self.measures {
            m.update(population, time);
        }
    }

    pub(crate) fn clear_all(&mut self) {
        for m in &mut self.measures {
            m.clear();
        }
    }
}
