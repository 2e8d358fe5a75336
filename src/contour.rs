//! The input side: contours as the host hands them to us, and a table that
//! lets segments refer back to them.

use std::{collections::HashMap, sync::Arc};

use kurbo::{Affine, BezPath};

use crate::Error;

/// An index into a [`ContourTable`].
///
/// Segments and trim pieces carry one of these instead of a reference to their
/// contour. Looking it up might fail, if the contour was removed from the table
/// in the meantime.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ContourIdx(pub usize);

/// A vector indexed by [`ContourIdx`].
#[derive(Clone, serde::Serialize)]
pub struct ContourVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(ContourVec, ContourIdx, "c");

/// An opaque style token.
///
/// We never look inside it; it just gets carried from contours to the pieces
/// and chains that come out of them. Cloning it is cheap.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Style(Arc<str>);

impl Style {
    /// Wraps a style string.
    pub fn new(s: impl Into<Arc<str>>) -> Self {
        Style(s.into())
    }

    /// The style string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl serde::Serialize for Style {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl From<&str> for Style {
    fn from(s: &str) -> Self {
        Style::new(s)
    }
}

/// Whether a contour's path data used absolute commands, relative commands, or both.
///
/// Once a path has been parsed into a [`BezPath`] this distinction is gone,
/// so it has to be recorded on the way in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Commands {
    /// Only upper-case (absolute) commands.
    #[default]
    Absolute,
    /// Only lower-case (relative) commands.
    Relative,
    /// A mix of the two.
    Mixed,
}

impl Commands {
    /// Classifies SVG path data by the case of its command letters.
    ///
    /// Path data without any command letters counts as absolute.
    pub fn detect(svg_data: &str) -> Self {
        const COMMANDS: &str = "mlhvcsqtaz";
        let relative = svg_data.chars().any(|c| COMMANDS.contains(c));
        let absolute = svg_data
            .chars()
            .any(|c| c.is_ascii_uppercase() && COMMANDS.contains(c.to_ascii_lowercase()));
        match (relative, absolute) {
            (true, true) => Commands::Mixed,
            (true, false) => Commands::Relative,
            (false, _) => Commands::Absolute,
        }
    }
}

/// A path, as handed to us by the host.
#[derive(Clone, Debug)]
pub struct Contour {
    /// The host's identifier for this path.
    pub id: String,
    /// The path itself, in the contour's local coordinates.
    pub path: BezPath,
    /// Maps local coordinates to the common coordinate system.
    pub transform: Affine,
    /// The style to carry along to the output.
    pub style: Style,
    /// How the path data was written.
    pub commands: Commands,
}

impl Contour {
    /// A contour with an identity transform and an empty style.
    pub fn new(id: impl Into<String>, path: BezPath) -> Self {
        Contour {
            id: id.into(),
            path,
            transform: Affine::IDENTITY,
            style: Style::default(),
            commands: Commands::Absolute,
        }
    }

    /// Parses SVG path data, recording whether it used relative commands.
    pub fn from_svg(id: impl Into<String>, data: &str) -> Result<Self, Error> {
        let id = id.into();
        let path = BezPath::from_svg(data).map_err(|e| Error::PathData {
            id: id.clone(),
            reason: e.to_string(),
        })?;
        Ok(Contour {
            commands: Commands::detect(data),
            ..Contour::new(id, path)
        })
    }

    /// Replaces the transform.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Replaces the style.
    pub fn with_style(mut self, style: impl Into<Style>) -> Self {
        self.style = style.into();
        self
    }
}

/// What we remember about a contour after it has been segmented.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ContourInfo {
    /// The host's identifier.
    pub id: String,
    /// The contour's style.
    pub style: Style,
    /// How the path data was written.
    pub commands: Commands,
}

impl From<&Contour> for ContourInfo {
    fn from(c: &Contour) -> Self {
        ContourInfo {
            id: c.id.clone(),
            style: c.style.clone(),
            commands: c.commands,
        }
    }
}

/// A lookup table of contours, with deletion.
///
/// Removing an entry doesn't shift the others around: any [`ContourIdx`] that
/// was handed out stays valid as a key, and looking up a removed one just
/// returns `None`.
#[derive(Clone, Debug, Default)]
pub struct ContourTable {
    entries: ContourVec<Option<ContourInfo>>,
    by_id: HashMap<String, ContourIdx>,
}

impl ContourTable {
    /// Adds a contour, returning its index.
    ///
    /// If the id was already taken, [`ContourTable::find`] will return the new
    /// entry from now on. The old one stays reachable through its index.
    pub fn insert(&mut self, info: ContourInfo) -> ContourIdx {
        let id = info.id.clone();
        let idx = self.entries.push(Some(info));
        self.by_id.insert(id, idx);
        idx
    }

    /// Looks up a contour.
    pub fn get(&self, idx: ContourIdx) -> Option<&ContourInfo> {
        self.entries.get(idx).and_then(Option::as_ref)
    }

    /// Removes a contour, returning it if it was still there.
    pub fn remove(&mut self, idx: ContourIdx) -> Option<ContourInfo> {
        let info = self.entries.get_mut(idx)?.take()?;
        if self.by_id.get(&info.id) == Some(&idx) {
            self.by_id.remove(&info.id);
        }
        Some(info)
    }

    /// Finds a contour by its host identifier.
    pub fn find(&self, id: &str) -> Option<ContourIdx> {
        self.by_id.get(id).copied()
    }

    /// The number of contours still in the table.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Is the table empty (or have all its contours been removed)?
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Iterates over the contours still in the table.
    pub fn iter(&self) -> impl Iterator<Item = (ContourIdx, &ContourInfo)> + '_ {
        self.entries
            .iter()
            .filter_map(|(idx, info)| info.as_ref().map(|info| (idx, info)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn command_detection() {
        assert_eq!(Commands::detect("M 0 0 L 10 10"), Commands::Absolute);
        assert_eq!(Commands::detect("m 0 0 l 10 10 z"), Commands::Relative);
        assert_eq!(Commands::detect("M 0 0 l 10 10 Z"), Commands::Mixed);
        // Exponents aren't commands.
        assert_eq!(Commands::detect("M 1e2 0 L 3E1 1"), Commands::Absolute);
        assert_eq!(Commands::detect(""), Commands::Absolute);
    }

    #[test]
    fn from_svg() {
        let c = Contour::from_svg("p1", "m 0 0 l 10 0").unwrap();
        assert_eq!(c.commands, Commands::Relative);
        assert_eq!(c.path.elements().len(), 2);

        assert_matches!(
            Contour::from_svg("bad", "M 0 0 L x"),
            Err(Error::PathData { id, .. }) if id == "bad"
        );
    }

    #[test]
    fn deletion_tolerant_lookup() {
        let mut table = ContourTable::default();
        let a = table.insert(ContourInfo::from(&Contour::new("a", BezPath::new())));
        let b = table.insert(ContourInfo::from(&Contour::new("b", BezPath::new())));
        assert_eq!(table.len(), 2);
        assert_eq!(table.find("b"), Some(b));

        assert!(table.remove(a).is_some());
        assert!(table.remove(a).is_none());
        assert!(table.get(a).is_none());
        assert!(table.find("a").is_none());
        assert!(table.get(ContourIdx(17)).is_none());
        assert_eq!(table.get(b).unwrap().id, "b");
        assert_eq!(table.len(), 1);
    }
}
