use crate::error::{Result, StructureError};
use crate::structure::Structure;

/// Pretty-printed JSON, the form a structure is stored in.
pub fn to_json_string(structure: &Structure) -> Result<String> {
    Ok(serde_json::to_string_pretty(structure)?)
}

pub fn from_json_str(json: &str) -> Result<Structure> {
    let structure: Structure = serde_json::from_str(json)?;
    finish_load(structure)
}

/// Checks a freshly decoded structure and fills in what older files omit.
pub(crate) fn finish_load(mut structure: Structure) -> Result<Structure> {
    if structure.id.trim().is_empty() {
        return Err(StructureError::StructureLoad("structure id is empty".to_string()));
    }
    let (x, y, z) = structure.size;
    if x <= 0 || y <= 0 || z <= 0 {
        return Err(StructureError::StructureLoad(format!(
            "structure '{}' has invalid size {}x{}x{}",
            structure.id, x, y, z
        )));
    }

    structure.metadata_mut().sanitize();
    Ok(structure)
}
