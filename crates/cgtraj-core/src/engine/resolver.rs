use crate::core::registry::templates::BeadTemplate;

/// Resolves a group of bead templates against a concrete residue index.
///
/// Each template's offset is added to `current_resid`; a template whose
/// target lands past the highest valid residue index is silently dropped
/// (residues near a chain end simply have fewer defined measurements — this
/// is edge-case policy, not an error). The surviving templates produce the
/// concrete bead names, in template order, from which both the selection and
/// the measurement name are built.
///
/// Returns an empty vector when every template is dropped; downstream the
/// measurement evaluator treats the resulting undersized group as undefined.
pub fn resolve_beads(
    group: &[BeadTemplate],
    valid_resids: &[isize],
    current_resid: isize,
) -> Vec<String> {
    let Some(max_resid) = valid_resids.iter().copied().max() else {
        return Vec::new();
    };

    group
        .iter()
        .filter(|template| current_resid + template.offset <= max_resid)
        .map(|template| template.resolve(current_resid))
        .collect()
}

/// Builds the measurement name for a resolved bead group: the concrete bead
/// names joined by underscores. Identical resolved sequences always yield
/// the same name and therefore accumulate into the same container.
pub fn measurement_name(resolved: &[String]) -> String {
    resolved.join("_")
}
