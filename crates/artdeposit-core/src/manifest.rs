//! Transfer manifest (`manifest.xml`).
//!
//! Identical for every deposit except the `group-doi`, which is derived from
//! the artifact DOI's prefix.

use crate::config::DepositConfig;
use crate::doi::Doi;
use crate::xml::{Document, Element};

pub const MANIFEST_DOCTYPE: &str = r#"submission PUBLIC "-//Atypon//DTD Literatum Content Submission Manifest DTD v4.2 20140519//EN" "atypon/submissionmanifest.4.2.dtd""#;

pub fn group_doi(artifact: &Doi) -> String {
    format!("{}/artifacts-group", artifact.prefix())
}

pub fn build_manifest(config: &DepositConfig, artifact: &Doi) -> Document {
    let root = Element::new("submission")
        .attr("group-doi", group_doi(artifact))
        .attr("submission-type", "full")
        .child(Element::new("callback").child(Element::new("email").text(&config.callback_email)))
        .child(
            Element::new("processing-instructions")
                .child(Element::new("make-live").attr("on-condition", "no-fatals")),
        );
    Document::new(root).with_doctype(MANIFEST_DOCTYPE)
}
