use std::fmt::Display;
use std::fmt::Formatter;

use crate::containers::StorageKey;

macro_rules! entity_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl $name {
            pub fn new(index: usize) -> $name {
                $name(index)
            }
        }

        impl StorageKey for $name {
            fn index(&self) -> usize {
                self.0
            }

            fn create_from_index(index: usize) -> Self {
                $name(index)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(ShiftId, "Identifies a shift by its position in the planning horizon.");
entity_id!(LineId, "Identifies a production line.");
entity_id!(StageId, "Identifies a stage, i.e. a single work post of a line.");
entity_id!(WorkerId, "Identifies a worker.");
entity_id!(EquipmentId, "Identifies an equipment item.");
entity_id!(FunctionId, "Identifies a function an equipment item can perform.");
