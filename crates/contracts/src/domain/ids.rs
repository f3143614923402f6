//! Integer identifiers assigned by the backend, one newtype per aggregate.

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn value(&self) -> i64 {
                self.0
            }

            pub fn parse(s: &str) -> Option<Self> {
                s.trim().parse::<i64>().ok().map(Self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Cliente primary key
    ClienteId
);
entity_id!(ProveedorId);
entity_id!(ProductoId);
entity_id!(
    /// Albarán (delivery note) primary key
    AlbaranId
);
entity_id!(MovimientoId);
entity_id!(
    /// Truck number; trucks exist implicitly through route assignments
    CamionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_serde() {
        let id: AlbaranId = serde_json::from_str("42").unwrap();
        assert_eq!(id, AlbaranId(42));
        assert_eq!(serde_json::to_string(&CamionId(3)).unwrap(), "3");
        assert_eq!(ClienteId::parse(" 7 "), Some(ClienteId(7)));
        assert_eq!(ClienteId::parse("x"), None);
        assert_eq!(ProductoId(5).to_string(), "5");
    }
}
