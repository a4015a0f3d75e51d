use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use std::str::FromStr;

pub const NAMESPACE: &str = "minecraft:";

/// A voxel as the host world sees it: a namespaced material id plus the raw
/// string properties of its state. Properties are kept sorted by key so that two
/// states built in different orders compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    pub name: SmolStr,
    pub properties: Vec<(SmolStr, SmolStr)>,
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.properties.is_empty() {
            write!(f, "[")?;
            for (i, (key, value)) in self.properties.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}={}", key, value)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl BlockState {
    /// Creates a state with no properties. Bare ids get the `minecraft:` namespace.
    pub fn new(name: impl AsRef<str>) -> Self {
        BlockState {
            name: qualify(name.as_ref()),
            properties: Vec::new(),
        }
    }

    pub fn air() -> Self {
        BlockState::new("minecraft:air")
    }

    pub fn get_name(&self) -> &str {
        self.name.as_str()
    }

    /// Material id without the namespace, e.g. `oak_log`.
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    pub fn is_air(&self) -> bool {
        matches!(self.short_name(), "air" | "cave_air" | "void_air")
    }

    pub fn with_property(mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn set_property(&mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) {
        let key = key.into();
        let value = value.into();
        match self.properties.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(index) => self.properties[index].1 = value,
            Err(index) => self.properties.insert(index, (key, value)),
        }
    }

    pub fn remove_property(&mut self, key: &str) {
        self.properties.retain(|(k, _)| k != key);
    }

    pub fn get_property(&self, key: &str) -> Option<&SmolStr> {
        self.properties
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .ok()
            .map(|index| &self.properties[index].1)
    }

    /// Same material with every property dropped.
    pub fn without_properties(&self) -> Self {
        BlockState {
            name: self.name.clone(),
            properties: Vec::new(),
        }
    }
}

impl FromStr for BlockState {
    type Err = String;

    /// Parses `name` or `name[key=value,...]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, rest) = match s.find('[') {
            Some(open) => {
                if !s.ends_with(']') {
                    return Err(format!("Unterminated property list in '{}'", s));
                }
                (&s[..open], Some(&s[open + 1..s.len() - 1]))
            }
            None => (s, None),
        };
        if name.is_empty() {
            return Err("Block state has an empty name".to_string());
        }

        let mut state = BlockState::new(name);
        if let Some(rest) = rest {
            for pair in rest.split(',').filter(|p| !p.trim().is_empty()) {
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("Malformed property '{}' in '{}'", pair, s))?;
                state.set_property(key.trim(), value.trim());
            }
        }
        Ok(state)
    }
}

pub fn short_name(name: &str) -> &str {
    name.strip_prefix(NAMESPACE).unwrap_or(name)
}

/// Normalizes a material id to lower-case namespaced form.
pub fn qualify(name: &str) -> SmolStr {
    let lower = name.trim().to_ascii_lowercase();
    if lower.contains(':') {
        SmolStr::new(lower)
    } else {
        SmolStr::new(format!("{}{}", NAMESPACE, lower))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_state_creation() {
        let block = BlockState::new("minecraft:oak_stairs").with_property("facing", "north");

        assert_eq!(block.name, "minecraft:oak_stairs");
        assert_eq!(
            block.get_property("facing").map(|s| s.as_str()),
            Some("north")
        );
    }

    #[test]
    fn test_bare_and_upper_case_ids_are_qualified() {
        assert_eq!(BlockState::new("STONE").name, "minecraft:stone");
        assert_eq!(BlockState::new("mymod:Crate").name, "mymod:crate");
        assert_eq!(BlockState::new("minecraft:oak_log").short_name(), "oak_log");
    }

    #[test]
    fn test_property_order_does_not_affect_equality() {
        let a = BlockState::new("oak_door")
            .with_property("half", "lower")
            .with_property("facing", "east");
        let b = BlockState::new("oak_door")
            .with_property("facing", "east")
            .with_property("half", "lower");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "minecraft:oak_door[facing=east,half=lower]");
    }

    #[test]
    fn test_parse_round_trips_display() {
        let parsed: BlockState = "minecraft:glass_pane[east=true,north=false]".parse().unwrap();
        assert_eq!(parsed.get_property("east").map(|s| s.as_str()), Some("true"));
        assert_eq!(parsed.to_string(), "minecraft:glass_pane[east=true,north=false]");

        assert!("oak_log[axis=y".parse::<BlockState>().is_err());
        assert!("[axis=y]".parse::<BlockState>().is_err());
    }

    #[test]
    fn test_air_variants() {
        assert!(BlockState::air().is_air());
        assert!(BlockState::new("cave_air").is_air());
        assert!(!BlockState::new("barrier").is_air());
    }
}
