use crate::containers::StorageKey;

/// Dense identifier of a decision variable within a [`Model`](crate::model::Model).
///
/// Booleans and bounded integers share one variable table; the typed handles [`BoolVar`] and
/// [`IntVar`] both wrap a `VariableId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct VariableId {
    pub(crate) id: u32,
}

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId { id: index as u32 }
    }
}

/// A boolean decision variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoolVar {
    pub(crate) id: VariableId,
}

/// A bounded integer decision variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntVar {
    pub(crate) id: VariableId,
}

impl From<BoolVar> for IntVar {
    /// View a boolean as the 0/1 integer it is stored as.
    fn from(variable: BoolVar) -> IntVar {
        IntVar { id: variable.id }
    }
}

impl BoolVar {
    /// Create a linear term `weight * self`, treating the boolean as a 0/1 integer.
    pub fn scaled(self, weight: i32) -> LinearTerm {
        IntVar::from(self).scaled(weight)
    }
}

impl IntVar {
    /// Create a linear term `weight * self`.
    pub fn scaled(self, weight: i32) -> LinearTerm {
        LinearTerm {
            variable: self.id,
            weight,
        }
    }
}

/// A single `weight * variable` term of a linear constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearTerm {
    pub(crate) variable: VariableId,
    pub(crate) weight: i32,
}

impl From<IntVar> for LinearTerm {
    fn from(variable: IntVar) -> LinearTerm {
        variable.scaled(1)
    }
}

impl From<BoolVar> for LinearTerm {
    fn from(variable: BoolVar) -> LinearTerm {
        variable.scaled(1)
    }
}

/// Bounds, branching metadata and the debug name of a variable.
#[derive(Clone, Debug)]
pub(crate) struct VariableInfo {
    pub(crate) lower_bound: i32,
    pub(crate) upper_bound: i32,
    pub(crate) is_boolean: bool,
    pub(crate) hint: Option<i32>,
    pub(crate) name: Option<String>,
}
