use crate::LayoutError;

/// Sizes of one table axis (columns or rows) at three levels.
///
/// Explicit sizes come from styles and lock once harvested. Calculated sizes
/// are derived from spans and the table's own size. Measured sizes come from
/// laying out cell content.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxis {
    name: &'static str,
    explicit: Vec<Option<f32>>,
    calculated: Vec<Option<f32>>,
    measured: Vec<Option<f32>>,
    locked: bool,
}

impl GridAxis {
    pub fn new(name: &'static str, len: usize) -> Self {
        Self {
            name,
            explicit: vec![None; len],
            calculated: vec![None; len],
            measured: vec![None; len],
            locked: false,
        }
    }

    pub fn len(&self) -> usize {
        self.explicit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty()
    }

    /// Records an explicit size, keeping the larger one on disagreement.
    pub fn set_explicit(&mut self, index: usize, value: f32) -> Result<(), LayoutError> {
        if self.locked {
            return Err(LayoutError::ExplicitLocked { axis: self.name, index });
        }
        let slot = &mut self.explicit[index];
        *slot = Some(slot.map_or(value, |v| v.max(value)));
        Ok(())
    }

    pub fn lock_explicit(&mut self) {
        self.locked = true;
    }

    pub fn explicit(&self, index: usize) -> Option<f32> {
        self.explicit[index]
    }

    pub fn calculated(&self, index: usize) -> Option<f32> {
        self.calculated[index]
    }

    pub fn set_calculated(&mut self, index: usize, value: f32) {
        self.calculated[index] = Some(value);
    }

    pub fn measured(&self, index: usize) -> Option<f32> {
        self.measured[index]
    }

    /// Raises the measured size to at least `value`.
    pub fn grow_measured(&mut self, index: usize, value: f32) {
        let slot = &mut self.measured[index];
        *slot = Some(slot.map_or(value, |v| v.max(value)));
    }

    /// The size allotted before measurement: calculated if set, else explicit.
    pub fn allotted(&self, index: usize) -> Option<f32> {
        self.calculated[index].or(self.explicit[index])
    }

    pub fn unsized_indices(&self) -> Vec<usize> {
        (0..self.len()).filter(|i| self.allotted(*i).is_none()).collect()
    }

    pub fn total_allotted(&self) -> f32 {
        (0..self.len()).filter_map(|i| self.allotted(i)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_keeps_max_and_locks() {
        let mut axis = GridAxis::new("column", 2);
        axis.set_explicit(0, 50.0).unwrap();
        axis.set_explicit(0, 80.0).unwrap();
        axis.set_explicit(0, 60.0).unwrap();
        assert_eq!(axis.explicit(0), Some(80.0));
        axis.lock_explicit();
        assert!(matches!(
            axis.set_explicit(1, 10.0),
            Err(LayoutError::ExplicitLocked { axis: "column", index: 1 })
        ));
    }

    #[test]
    fn test_calculated_overrides_explicit_allotment() {
        let mut axis = GridAxis::new("row", 3);
        axis.set_explicit(0, 10.0).unwrap();
        axis.set_calculated(0, 25.0);
        axis.set_explicit(1, 5.0).unwrap();
        assert_eq!(axis.allotted(0), Some(25.0));
        assert_eq!(axis.unsized_indices(), vec![2]);
        assert_eq!(axis.total_allotted(), 30.0);
    }
}
