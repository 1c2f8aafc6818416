use std::fs;
use std::path::Path;

use log::info;

use crate::config::UserConfig;
use crate::data::ExtractedPaths;
use crate::errors::Result;

use super::assemble::assemble;
use super::kml::render_kml;
use super::passes::nodes::NodePass;
use super::passes::relations::RelationPass;
use super::passes::ways::WayPass;
use super::passes::Pass;
use super::Etl;

pub const ETL_NAME: &str = "marked_paths";

/// Both KML documents, fully rendered before anything touches the output paths.
pub struct RenderedDocuments {
    pub grouped: Vec<u8>,
    pub split: Vec<u8>,
}

pub struct MarkedPathsEtl<'a> {
    config: &'a UserConfig,
}

impl MarkedPathsEtl<'_> {
    pub fn new(config: &UserConfig) -> MarkedPathsEtl {
        MarkedPathsEtl { config }
    }

    fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
        info!(path = &*path.to_string_lossy(), bytes = bytes.len(); "Wrote KML");
        Ok(())
    }
}

impl Etl for MarkedPathsEtl<'_> {
    type Input = ExtractedPaths;
    type Output = RenderedDocuments;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    /// Runs the relation, way and node passes, each over its own fresh stream.
    fn extract(&mut self) -> Result<ExtractedPaths> {
        let source = Path::new(&self.config.input_path);

        let relation_scan = RelationPass::new(&self.config.marker_tag_key).process(source)?;
        let way_scan = WayPass::new(relation_scan.way_membership).process(source)?;
        let node_scan = NodePass::new(way_scan.node_membership).process(source)?;

        Ok(ExtractedPaths {
            relations: relation_scan.relations,
            ways: way_scan.ways,
            nodes: node_scan.nodes,
        })
    }

    fn transform(&mut self, input: ExtractedPaths) -> Result<RenderedDocuments> {
        let geometries = assemble(&input, &self.config.icon_base_path)?;
        info!(
            etl_name = ETL_NAME,
            grouped_placemarks = geometries.grouped.len(),
            split_placemarks = geometries.split.len();
            "Assembled geometries"
        );

        Ok(RenderedDocuments {
            grouped: render_kml(&geometries.grouped)?,
            split: render_kml(&geometries.split)?,
        })
    }

    fn load(&mut self, output: RenderedDocuments) -> Result<()> {
        Self::write_output(Path::new(&self.config.output_path_grouped), &output.grouped)?;
        Self::write_output(Path::new(&self.config.output_path_split), &output.split)?;
        Ok(())
    }
}
