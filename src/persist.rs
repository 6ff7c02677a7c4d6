//! Tag tree persistence
//!
//! A map is saved as a tree of typed tags. Turning that tree into bytes is
//! left to the host. Cross references are stored as plain `i32` indices with
//! `-1` for "none", and every index is range-checked on load.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{Features, IslandParameters, IslandParametersBuilder};
use crate::error::{MapError, Result};
use crate::geometry::Point;
use crate::graph::{
    Attribute, Canyon, Corner, CornerFlags, Edge, Lake, Region, RegionFlags, River, RiverAttribute,
};
use crate::map::Map;
use crate::terrain::Biome;

/// A single typed value in a tag tree
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Int(i32),
    Long(i64),
    Double(f64),
    IntArray(Vec<i32>),
    String(String),
    List(Vec<Tag>),
    Compound(TagCompound),
}

impl Tag {
    fn type_name(&self) -> &'static str {
        match self {
            Tag::Byte(_) => "byte",
            Tag::Int(_) => "int",
            Tag::Long(_) => "long",
            Tag::Double(_) => "double",
            Tag::IntArray(_) => "int array",
            Tag::String(_) => "string",
            Tag::List(_) => "list",
            Tag::Compound(_) => "compound",
        }
    }
}

/// A keyed collection of tags
///
/// Getters fail with `MissingTag` when the key is absent and with `TagType`
/// when it holds another type.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagCompound(BTreeMap<String, Tag>);

macro_rules! typed_access {
    ($put:ident, $get:ident, $variant:ident, $ty:ty, $name:literal) => {
        pub fn $put(&mut self, key: &str, value: $ty) {
            self.insert(key, Tag::$variant(value));
        }

        pub fn $get(&self, key: &str) -> Result<$ty> {
            match self.require(key)? {
                Tag::$variant(v) => Ok(v.clone()),
                other => Err(type_error(key, $name, other)),
            }
        }
    };
}

impl TagCompound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, tag: Tag) -> Option<Tag> {
        self.0.insert(key.to_string(), tag)
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn require(&self, key: &str) -> Result<&Tag> {
        self.0
            .get(key)
            .ok_or_else(|| MapError::MissingTag(key.to_string()))
    }

    typed_access!(put_byte, get_byte, Byte, i8, "byte");
    typed_access!(put_int, get_int, Int, i32, "int");
    typed_access!(put_long, get_long, Long, i64, "long");
    typed_access!(put_double, get_double, Double, f64, "double");
    typed_access!(put_string, get_string, String, String, "string");

    pub fn put_int_array(&mut self, key: &str, values: Vec<i32>) {
        self.insert(key, Tag::IntArray(values));
    }

    pub fn get_int_array(&self, key: &str) -> Result<&[i32]> {
        match self.require(key)? {
            Tag::IntArray(v) => Ok(v),
            other => Err(type_error(key, "int array", other)),
        }
    }

    pub fn put_list(&mut self, key: &str, values: Vec<Tag>) {
        self.insert(key, Tag::List(values));
    }

    pub fn get_list(&self, key: &str) -> Result<&[Tag]> {
        match self.require(key)? {
            Tag::List(v) => Ok(v),
            other => Err(type_error(key, "list", other)),
        }
    }

    pub fn put_compound(&mut self, key: &str, value: TagCompound) {
        self.insert(key, Tag::Compound(value));
    }

    pub fn get_compound(&self, key: &str) -> Result<&TagCompound> {
        match self.require(key)? {
            Tag::Compound(v) => Ok(v),
            other => Err(type_error(key, "compound", other)),
        }
    }
}

fn type_error(key: &str, expected: &'static str, found: &Tag) -> MapError {
    log::trace!("tag {} holds a {}, wanted {}", key, found.type_name(), expected);
    MapError::TagType {
        key: key.to_string(),
        expected,
    }
}

/// Compound entries of a list, in order
fn compounds<'a>(key: &str, list: &'a [Tag]) -> Result<Vec<&'a TagCompound>> {
    list.iter()
        .map(|tag| match tag {
            Tag::Compound(c) => Ok(c),
            other => Err(type_error(key, "compound", other)),
        })
        .collect()
}

fn index_to_tag(index: usize) -> i32 {
    index as i32
}

fn option_to_tag(index: Option<usize>) -> i32 {
    index.map_or(-1, index_to_tag)
}

fn indices_to_tag(indices: &[usize]) -> Vec<i32> {
    indices.iter().copied().map(index_to_tag).collect()
}

/// Arena sizes used to range-check references while loading
#[derive(Debug, Clone, Copy)]
struct Arenas {
    regions: usize,
    corners: usize,
    edges: usize,
}

#[derive(Debug, Clone, Copy)]
enum Arena {
    Region,
    Corner,
    Edge,
}

impl Arenas {
    fn check(&self, arena: Arena, index: i32) -> Result<usize> {
        let (kind, len) = match arena {
            Arena::Region => ("region", self.regions),
            Arena::Corner => ("corner", self.corners),
            Arena::Edge => ("edge", self.edges),
        };
        if index < 0 || index as usize >= len {
            return Err(MapError::InvalidReference {
                kind,
                index: i64::from(index),
                len,
            });
        }
        Ok(index as usize)
    }

    fn check_option(&self, arena: Arena, index: i32) -> Result<Option<usize>> {
        if index == -1 {
            Ok(None)
        } else {
            self.check(arena, index).map(Some)
        }
    }

    fn check_all(&self, arena: Arena, indices: &[i32]) -> Result<Vec<usize>> {
        indices.iter().map(|&i| self.check(arena, i)).collect()
    }
}

fn write_params(params: &IslandParameters) -> TagCompound {
    let mut tag = TagCompound::new();
    tag.put_long("seed", params.seed as i64);
    tag.put_long("size", i64::from(params.size));
    tag.put_byte("features", params.features.bits() as i8);
    tag.put_double("lake_threshold", params.lake_threshold);
    tag.put_double("max_height", params.max_height);
    tag.put_long("shape_seed", params.shape_seed as i64);
    tag.put_byte("abort_noise_on_underflow", i8::from(params.abort_noise_on_underflow));
    tag
}

fn read_params(tag: &TagCompound) -> Result<IslandParameters> {
    let size = u32::try_from(tag.get_long("size")?)
        .map_err(|_| MapError::InvalidConfig("map size out of range".to_string()))?;
    IslandParametersBuilder::new()
        .seed(tag.get_long("seed")? as u64)
        .size(size)?
        .features(Features::from_bits_truncate(tag.get_byte("features")? as u8))
        .lake_threshold(tag.get_double("lake_threshold")?)?
        .max_height(tag.get_double("max_height")?)?
        .shape_seed(tag.get_long("shape_seed")? as u64)
        .abort_noise_on_underflow(tag.get_byte("abort_noise_on_underflow")? != 0)
        .build()
}

fn write_region(region: &Region) -> TagCompound {
    let mut tag = TagCompound::new();
    tag.put_double("x", region.point.x);
    tag.put_double("y", region.point.y);
    tag.put_double("elevation", region.elevation);
    tag.put_double("moisture", region.moisture);
    tag.put_byte("biome", region.biome.id() as i8);
    tag.put_int("flags", i32::from(region.flags.bits()));
    tag.put_int_array("neighbors", indices_to_tag(&region.neighbors));
    tag.put_int_array("corners", indices_to_tag(&region.corners));
    tag.put_int_array("borders", indices_to_tag(&region.borders));
    tag.put_int("downslope", option_to_tag(region.downslope));

    let attributes = region
        .attributes
        .values()
        .map(|attribute| match attribute {
            Attribute::River(river) => {
                let mut a = TagCompound::new();
                a.put_string("kind", "river".to_string());
                a.put_double("magnitude", river.magnitude);
                a.put_int_array("upriver", indices_to_tag(&river.upriver));
                a.put_int("downriver", option_to_tag(river.downriver));
                Tag::Compound(a)
            }
        })
        .collect();
    tag.put_list("attributes", attributes);
    tag
}

fn read_region(index: usize, tag: &TagCompound, arenas: &Arenas) -> Result<Region> {
    let point = Point::new(tag.get_double("x")?, tag.get_double("y")?);
    let mut region = Region::new(index, point);
    region.elevation = tag.get_double("elevation")?;
    region.moisture = tag.get_double("moisture")?;
    region.biome = Biome::from_id(tag.get_byte("biome")? as u8)?;
    region.flags = RegionFlags::from_bits_truncate(tag.get_int("flags")? as u16);
    region.neighbors = arenas.check_all(Arena::Region, tag.get_int_array("neighbors")?)?;
    region.corners = arenas.check_all(Arena::Corner, tag.get_int_array("corners")?)?;
    region.borders = arenas.check_all(Arena::Edge, tag.get_int_array("borders")?)?;
    region.downslope = arenas.check_option(Arena::Region, tag.get_int("downslope")?)?;

    for attribute in compounds("attributes", tag.get_list("attributes")?)? {
        let kind = attribute.get_string("kind")?;
        match kind.as_str() {
            "river" => {
                let river = RiverAttribute {
                    magnitude: attribute.get_double("magnitude")?,
                    upriver: arenas.check_all(Arena::Region, attribute.get_int_array("upriver")?)?,
                    downriver: arenas.check_option(Arena::Region, attribute.get_int("downriver")?)?,
                };
                let attribute = Attribute::River(river);
                region.attributes.insert(attribute.kind(), attribute);
            }
            other => log::warn!("skipping unknown attribute {:?} on region {}", other, index),
        }
    }
    Ok(region)
}

fn write_corner(corner: &Corner) -> TagCompound {
    let mut tag = TagCompound::new();
    tag.put_double("x", corner.point.x);
    tag.put_double("y", corner.point.y);
    tag.put_double("elevation", corner.elevation);
    tag.put_double("moisture", corner.moisture);
    tag.put_byte("flags", corner.flags.bits() as i8);
    tag.put_int_array("adjacent", indices_to_tag(&corner.adjacent));
    tag.put_int_array("touches", indices_to_tag(&corner.touches));
    tag.put_int_array("protrudes", indices_to_tag(&corner.protrudes));
    tag
}

fn read_corner(index: usize, tag: &TagCompound, arenas: &Arenas) -> Result<Corner> {
    let point = Point::new(tag.get_double("x")?, tag.get_double("y")?);
    let mut corner = Corner::new(index, point);
    corner.elevation = tag.get_double("elevation")?;
    corner.moisture = tag.get_double("moisture")?;
    corner.flags = CornerFlags::from_bits_truncate(tag.get_byte("flags")? as u8);
    corner.adjacent = arenas.check_all(Arena::Corner, tag.get_int_array("adjacent")?)?;
    corner.touches = arenas.check_all(Arena::Region, tag.get_int_array("touches")?)?;
    corner.protrudes = arenas.check_all(Arena::Edge, tag.get_int_array("protrudes")?)?;
    Ok(corner)
}

fn write_edge(edge: &Edge) -> TagCompound {
    let mut tag = TagCompound::new();
    tag.put_int("d0", option_to_tag(edge.d0));
    tag.put_int("d1", option_to_tag(edge.d1));
    tag.put_int("v0", option_to_tag(edge.v0));
    tag.put_int("v1", option_to_tag(edge.v1));
    if let Some(m) = edge.midpoint {
        tag.put_double("mx", m.x);
        tag.put_double("my", m.y);
    }
    tag
}

fn read_edge(index: usize, tag: &TagCompound, arenas: &Arenas) -> Result<Edge> {
    let mut edge = Edge::new(index);
    edge.d0 = arenas.check_option(Arena::Region, tag.get_int("d0")?)?;
    edge.d1 = arenas.check_option(Arena::Region, tag.get_int("d1")?)?;
    edge.v0 = arenas.check_option(Arena::Corner, tag.get_int("v0")?)?;
    edge.v1 = arenas.check_option(Arena::Corner, tag.get_int("v1")?)?;
    if tag.contains_key("mx") {
        edge.midpoint = Some(Point::new(tag.get_double("mx")?, tag.get_double("my")?));
    }
    Ok(edge)
}

fn chain_regions<'a>(nodes: impl Iterator<Item = &'a usize>) -> Vec<i32> {
    nodes.copied().map(index_to_tag).collect()
}

fn write_river(river: &River) -> TagCompound {
    let mut tag = TagCompound::new();
    tag.put_int_array("regions", chain_regions(river.nodes.iter().map(|n| &n.region)));
    tag.put_int("length_to_merge", river.length_to_merge as i32);
    tag.put_double("width", river.width);
    tag
}

fn read_river(tag: &TagCompound, arenas: &Arenas) -> Result<Option<River>> {
    let regions = arenas.check_all(Arena::Region, tag.get_int_array("regions")?)?;
    let Some((&source, rest)) = regions.split_first() else {
        return Ok(None);
    };
    let mut river = River::new(source);
    for &region in rest {
        river.push(region);
    }
    river.length_to_merge = usize::try_from(tag.get_int("length_to_merge")?)
        .map_err(|_| MapError::InvalidConfig("negative river length to merge".to_string()))?;
    river.width = tag.get_double("width")?;
    Ok(Some(river))
}

fn write_lake(lake: &Lake) -> TagCompound {
    let mut tag = TagCompound::new();
    tag.put_int_array("regions", indices_to_tag(lake.regions()));
    let (lowest, elevation) = match lake.lowest_entry() {
        Some((region, elevation)) => (index_to_tag(region), elevation),
        None => (-1, 0.0),
    };
    tag.put_int("lowest", lowest);
    tag.put_double("lowest_elevation", elevation);
    tag
}

fn read_lake(tag: &TagCompound, arenas: &Arenas) -> Result<Lake> {
    let regions = arenas.check_all(Arena::Region, tag.get_int_array("regions")?)?;
    let lowest = arenas
        .check_option(Arena::Region, tag.get_int("lowest")?)?
        .map(|region| tag.get_double("lowest_elevation").map(|e| (region, e)))
        .transpose()?;
    Ok(Lake::restore(regions, lowest))
}

fn write_canyon(canyon: &Canyon) -> TagCompound {
    let mut tag = TagCompound::new();
    tag.put_int_array("regions", chain_regions(canyon.nodes.iter().map(|n| &n.region)));
    tag.put_double("min_elevation", canyon.min_elevation);
    tag
}

fn read_canyon(tag: &TagCompound, arenas: &Arenas, regions: &[Region]) -> Result<Canyon> {
    let mut canyon = Canyon::new();
    for id in arenas.check_all(Arena::Region, tag.get_int_array("regions")?)? {
        canyon.push(id, regions[id].elevation);
    }
    canyon.min_elevation = tag.get_double("min_elevation")?;
    Ok(canyon)
}

fn list_of(items: impl Iterator<Item = TagCompound>) -> Vec<Tag> {
    items.map(Tag::Compound).collect()
}

impl Map {
    /// Save the whole map into a tag tree
    ///
    /// # Example
    ///
    /// ```
    /// use island_mapgen::*;
    ///
    /// let params = IslandParametersBuilder::new().seed(3).size(64).unwrap().build().unwrap();
    /// let map = Map::generate(params).unwrap();
    ///
    /// let tag = map.write_to_tag();
    /// let loaded = Map::read_from_tag(&tag).unwrap();
    /// assert_eq!(loaded.region_count(), map.region_count());
    /// ```
    pub fn write_to_tag(&self) -> TagCompound {
        let mut tag = TagCompound::new();
        tag.put_compound("params", write_params(&self.params));
        tag.put_list("regions", list_of(self.regions.iter().map(write_region)));
        tag.put_list("corners", list_of(self.corners.iter().map(write_corner)));
        tag.put_list("edges", list_of(self.edges.iter().map(write_edge)));
        tag.put_list("rivers", list_of(self.rivers.iter().map(write_river)));
        tag.put_list("lakes", list_of(self.lakes.iter().map(write_lake)));
        tag.put_list("canyons", list_of(self.canyons.iter().map(write_canyon)));
        tag
    }

    /// Load a map saved with [`Map::write_to_tag`]
    ///
    /// Arena sizes are read first so every stored index can be checked before
    /// it is used.
    ///
    /// # Errors
    ///
    /// `MissingTag` or `TagType` for a malformed tree, `InvalidReference` for
    /// an index outside its arena, `UnknownBiome` for an unknown biome id, and
    /// `InvalidConfig` for invalid stored parameters.
    pub fn read_from_tag(tag: &TagCompound) -> Result<Map> {
        let params = read_params(tag.get_compound("params")?)?;
        let region_tags = compounds("regions", tag.get_list("regions")?)?;
        let corner_tags = compounds("corners", tag.get_list("corners")?)?;
        let edge_tags = compounds("edges", tag.get_list("edges")?)?;
        let arenas = Arenas {
            regions: region_tags.len(),
            corners: corner_tags.len(),
            edges: edge_tags.len(),
        };

        let regions = region_tags
            .iter()
            .enumerate()
            .map(|(i, t)| read_region(i, t, &arenas))
            .collect::<Result<Vec<_>>>()?;
        let corners = corner_tags
            .iter()
            .enumerate()
            .map(|(i, t)| read_corner(i, t, &arenas))
            .collect::<Result<Vec<_>>>()?;
        let edges = edge_tags
            .iter()
            .enumerate()
            .map(|(i, t)| read_edge(i, t, &arenas))
            .collect::<Result<Vec<_>>>()?;

        let mut rivers = Vec::new();
        for t in compounds("rivers", tag.get_list("rivers")?)? {
            rivers.extend(read_river(t, &arenas)?);
        }
        let lakes = compounds("lakes", tag.get_list("lakes")?)?
            .into_iter()
            .map(|t| read_lake(t, &arenas))
            .collect::<Result<Vec<_>>>()?;
        let canyons = compounds("canyons", tag.get_list("canyons")?)?
            .into_iter()
            .map(|t| read_canyon(t, &arenas, &regions))
            .collect::<Result<Vec<_>>>()?;

        let mut map = Map {
            params,
            regions,
            corners,
            edges,
            rivers,
            lakes,
            canyons,
            #[cfg(feature = "spatial-index")]
            spatial_index: None,
        };
        map.rebuild_spatial_index();
        log::debug!(
            "loaded map with {} regions, {} corners, {} edges",
            arenas.regions,
            arenas.corners,
            arenas.edges
        );
        Ok(map)
    }
}
