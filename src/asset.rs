//! Boundary collaborators: name-keyed resource caching and the
//! file-format-coupled geometry helpers graph construction consumes.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::{GraphError, Result};

//------------------------------------------------------------------------------
// ResourceCache
//------------------------------------------------------------------------------

/// Name-keyed cache with insert-if-absent semantics. An explicit object
/// owned by the caller; no process-wide state.
#[derive(Debug)]
pub struct ResourceCache<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        ResourceCache::new()
    }
}

impl<T> ResourceCache<T> {
    pub fn new() -> Self {
        ResourceCache {
            entries: HashMap::new(),
        }
    }

    /// Return the cached entry, running the loader only on first use.
    pub fn load_with<F>(&mut self, name: &str, loader: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        if !self.entries.contains_key(name) {
            let value = loader()?;
            self.entries.insert(name.to_string(), value);
        }
        Ok(&self.entries[name])
    }

    /// Fetch a previously loaded entry.
    pub fn get(&self, name: &str) -> Option<&T> {
        let entry = self.entries.get(name);
        if entry.is_none() {
            error!("no resource loaded under name {name:?}");
        }
        entry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

//------------------------------------------------------------------------------
// Model vertices
//------------------------------------------------------------------------------

/// Raw `v`/`vn` records pulled from a Wavefront-style model file.
#[derive(Debug, Clone, Default)]
pub struct VertexData {
    pub positions: Vec<Vector3>,
    pub normals: Vec<Vector3>,
}

/// Load the position/normal records of a vertices-only model file.
/// Unknown record tags are skipped; the surviving positions and normals
/// must pair up one-to-one.
pub fn load_vertices<P: AsRef<Path>>(path: P) -> Result<VertexData> {
    let text = std::fs::read_to_string(path)?;
    let mut data = VertexData::default();
    for line in text.lines() {
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => data.positions.push(parse_vec3(&mut fields, "v")?),
            Some("vn") => data.normals.push(parse_vec3(&mut fields, "vn")?),
            Some(tag) => warn!("skipping record {tag:?} in model file"),
            None => {}
        }
    }
    if data.positions.len() != data.normals.len() {
        return Err(GraphError::ModelParse(format!(
            "{} positions but {} normals",
            data.positions.len(),
            data.normals.len()
        )));
    }
    Ok(data)
}

fn parse_vec3<'a, I>(fields: &mut I, tag: &str) -> Result<Vector3>
where
    I: Iterator<Item = &'a str>,
{
    let mut coord = [0.; 3];
    for c in coord.iter_mut() {
        *c = fields
            .next()
            .ok_or_else(|| GraphError::ModelParse(format!("truncated {tag} record")))?
            .parse()
            .map_err(|e| GraphError::ModelParse(format!("bad {tag} coordinate: {e}")))?;
    }
    Ok(Vector3::new(coord[0], coord[1], coord[2]))
}

//------------------------------------------------------------------------------
// Bounding box
//------------------------------------------------------------------------------

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vector3,
    pub max: Vector3,
}

impl Aabb {
    pub fn center(&self) -> Vector3 {
        (self.min + self.max) / 2.
    }

    pub fn extent(&self) -> Vector3 {
        self.max - self.min
    }
}

/// Header lines preceding the vertex block in exported mesh files.
const MESH_HEADER_LINES: usize = 3;

/// Scan a mesh file's vertex block for its bounding box, stopping at the
/// first non-vertex record. A vertex exactly at the origin is a sentinel,
/// not geometry, and is skipped.
pub fn bounding_box<P: AsRef<Path>>(path: P) -> Result<Aabb> {
    let file = File::open(path)?;
    let mut min = Vector3::repeat(f64::INFINITY);
    let mut max = Vector3::repeat(f64::NEG_INFINITY);

    for line in BufReader::new(file).lines().skip(MESH_HEADER_LINES) {
        let line = line?;
        let mut fields = line.split_whitespace();
        if fields.next() != Some("v") {
            break;
        }
        let v = parse_vec3(&mut fields, "v")?;
        if v == Vector3::zeros() {
            continue;
        }
        min = min.inf(&v);
        max = max.sup(&v);
    }
    Ok(Aabb { min, max })
}

#[cfg(test)]
mod tests {

    use std::cell::Cell;
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("defgraph_{}_{}", std::process::id(), name));
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "{contents}").unwrap();
        path
    }

    #[test]
    fn test_cache_loads_once() {
        let calls = Cell::new(0);
        let mut cache: ResourceCache<Vec<Vector3>> = ResourceCache::new();

        for _ in 0..3 {
            let sample = cache
                .load_with("bunny", || {
                    calls.set(calls.get() + 1);
                    Ok(vec![Vector3::zeros()])
                })
                .unwrap();
            assert_eq!(sample.len(), 1);
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);

        assert!(cache.get("bunny").is_some());
        assert!(cache.get("dragon").is_none());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_load_failure_is_not_cached() {
        let mut cache: ResourceCache<VertexData> = ResourceCache::new();
        let err = cache
            .load_with("missing", || Err(GraphError::ModelParse("no file".into())))
            .unwrap_err();
        assert!(matches!(err, GraphError::ModelParse(_)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_vertices() {
        let path = write_temp(
            "verts.obj",
            "v 1 2 3\nvn 0 0 1\nv -1 0 2\nvn 0 1 0\n# comment\n",
        );
        let data = load_vertices(&path).unwrap();
        assert_eq!(data.positions.len(), 2);
        assert_eq!(data.normals.len(), 2);
        assert_eq!(data.positions[1], Vector3::new(-1., 0., 2.));
        assert_eq!(data.normals[0], Vector3::new(0., 0., 1.));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_vertices_count_mismatch() {
        let path = write_temp("mismatch.obj", "v 1 2 3\nv 4 5 6\nvn 0 0 1\n");
        let err = load_vertices(&path).unwrap_err();
        assert!(matches!(err, GraphError::ModelParse(_)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_bounding_box() {
        let path = write_temp(
            "box.obj",
            "#### header\n#### header\n#### header\n\
             v 1 2 3\nv -1 0 0\nv 0 0 0\nv 4 -2 5\nf 1 2 3\n",
        );
        let aabb = bounding_box(&path).unwrap();
        assert_eq!(aabb.min, Vector3::new(-1., -2., 0.));
        assert_eq!(aabb.max, Vector3::new(4., 2., 5.));
        assert_eq!(aabb.center(), Vector3::new(1.5, 0., 2.5));
        assert_eq!(aabb.extent(), Vector3::new(5., 4., 5.));
        std::fs::remove_file(&path).ok();
    }
}
