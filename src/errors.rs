use std::{io, num::ParseIntError, path::PathBuf};

use thiserror::Error;

use crate::data::osm::OsmId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read config {path:?}: {source}")]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The OSM source is missing or could not be opened.
    #[error("source {path:?} is unreadable: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The token stream reported invalid markup. Aborts the running pass.
    #[error("malformed markup near byte {position}: {source}")]
    StreamMalformed {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute { element: String, attribute: String },

    #[error("<{element}> attribute `{attribute}` is not a valid id: {value:?}")]
    AttributeUnparseable {
        element: String,
        attribute: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// A retained way points at a node that pass 3 never saw.
    #[error("way {way} references node {node}, which is absent from the source")]
    DanglingReference { way: OsmId, node: OsmId },

    #[error("KML serialization failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
