use super::ids::AtomId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single = 1,
    Double = 2,
    Triple = 3,
    Aromatic = 4,
}

#[derive(Debug, Error)]
#[error("Invalid bond order string: '{0}'")]
pub struct ParseBondOrderError(pub String);

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;

    /// Accepts both plain names and the four-letter codes used by `_chem_comp_bond.value_order`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "s" | "single" | "sing" => Ok(Self::Single),
            "2" | "d" | "double" | "doub" => Ok(Self::Double),
            "3" | "t" | "triple" | "trip" => Ok(Self::Triple),
            "ar" | "arom" | "aromatic" | "delo" => Ok(Self::Aromatic),
            _ => Err(ParseBondOrderError(s.to_string())),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Aromatic => "Aromatic",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1_id: AtomId,
    pub atom2_id: AtomId,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Self {
        Self {
            atom1_id,
            atom2_id,
            order,
        }
    }

    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.atom1_id == atom_id || self.atom2_id == atom_id
    }

    /// Returns the partner of `atom_id` in this bond, if `atom_id` participates in it.
    pub fn partner_of(&self, atom_id: AtomId) -> Option<AtomId> {
        if self.atom1_id == atom_id {
            Some(self.atom2_id)
        } else if self.atom2_id == atom_id {
            Some(self.atom1_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn bond_order_parses_chem_comp_codes() {
        assert_eq!("SING".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("DOUB".parse::<BondOrder>().unwrap(), BondOrder::Double);
        assert_eq!("TRIP".parse::<BondOrder>().unwrap(), BondOrder::Triple);
        assert_eq!("AROM".parse::<BondOrder>().unwrap(), BondOrder::Aromatic);
        assert_eq!("delo".parse::<BondOrder>().unwrap(), BondOrder::Aromatic);
    }

    #[test]
    fn bond_order_parses_plain_names_case_insensitively() {
        assert_eq!("1".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("Double".parse::<BondOrder>().unwrap(), BondOrder::Double);
        assert_eq!(" t ".parse::<BondOrder>().unwrap(), BondOrder::Triple);
        assert_eq!("ar".parse::<BondOrder>().unwrap(), BondOrder::Aromatic);
    }

    #[test]
    fn bond_order_rejects_unknown_codes() {
        assert!("".parse::<BondOrder>().is_err());
        assert!("QUAD".parse::<BondOrder>().is_err());
        assert!("?".parse::<BondOrder>().is_err());
    }

    #[test]
    fn bond_order_default_is_single() {
        assert_eq!(BondOrder::default(), BondOrder::Single);
        assert_eq!(BondOrder::Double.to_string(), "Double");
    }

    #[test]
    fn bond_partner_lookup_is_symmetric() {
        let a1 = dummy_atom_id(1);
        let a2 = dummy_atom_id(2);
        let bond = Bond::new(a1, a2, BondOrder::Single);
        assert!(bond.contains(a1));
        assert!(bond.contains(a2));
        assert_eq!(bond.partner_of(a1), Some(a2));
        assert_eq!(bond.partner_of(a2), Some(a1));
        assert_eq!(bond.partner_of(dummy_atom_id(3)), None);
    }
}
