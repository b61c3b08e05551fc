//! METS/MODS metadata document for one artifact.
//!
//! The builders only take validated, typed inputs: presence of every field has
//! already been checked when the record was joined, so nothing here can fail.

use crate::badges::BadgeSet;
use crate::config::{BadgeDef, DepositConfig};
use crate::doi::Doi;
use crate::input::{AuthorEntry, PaperRecord};
use crate::xml::{escape_html, Document, Element};

pub const METS_NS: &str = "http://www.loc.gov/METS/";
pub const MODS_NS: &str = "http://www.loc.gov/mods/v3";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const ATPN_NS: &str = "http://www.atypon.com/digital-objects";

const METS_SCHEMA_LOCATION: &str =
    "http://www.loc.gov/METS/ http://www.loc.gov/standards/mets/mets.xsd";
const MODS_SCHEMA_LOCATION: &str =
    "http://www.loc.gov/mods/v3 http://www.loc.gov/standards/mods/v3/mods.xsd";
const ATPN_SCHEMA_LOCATION: &str =
    "http://www.atypon.com/digital-objects http://www.atypon.com/digital-objects/digital-objects.xsd";

/// Everything the metadata document is built from.
#[derive(Debug, Clone, Copy)]
pub struct MetadataInput<'a> {
    pub record: &'a PaperRecord,
    /// DOI of the deposited artifact.
    pub artifact_doi: &'a Doi,
    /// DOI of the published paper the artifact belongs to.
    pub paper_doi: &'a Doi,
    pub badges: &'a BadgeSet,
}

pub fn build_metadata(config: &DepositConfig, input: MetadataInput<'_>) -> Document {
    let mut mods = Element::new("mods")
        .attr("xmlns", MODS_NS)
        .attr("xsi:schemaLocation", MODS_SCHEMA_LOCATION)
        .child(
            mods_element("mods:identifier")
                .attr("type", "doi")
                .text(input.artifact_doi.full()),
        )
        .child(
            mods_element("mods:titleInfo")
                .attr("ID", "title")
                .child(Element::new("mods:title").text(&input.record.title))
                .child(Element::new("mods:subTitle")),
        )
        .children(input.record.authors.iter().map(author_name))
        .child(
            mods_element("mods:subject")
                .attr("authority", "artifact_type")
                .attr("ID", "type")
                .child(
                    Element::new("mods:topic")
                        .attr("authority", "artfc-software")
                        .text("software"),
                ),
        )
        .child(badge_subject(input.badges.topics(&config.badges)));

    if config.related_article {
        mods = mods.child(
            mods_element("mods:relatedItem")
                .attr("displayLabel", "Related Article")
                .attr("xlink:href", input.paper_doi.full())
                .attr("ID", "relatedDoi01")
                .text(""),
        );
    }

    let mods = mods
        .child(mods_element("mods:extension").child(do_extensions(config, input.artifact_doi)))
        .child(
            mods_element("mods:originInfo").child(
                Element::new("mods:dateIssued")
                    .attr("encoding", "iso8601")
                    .text(config.issue_date_iso()),
            ),
        );

    let root = Element::new("mets")
        .attr("xmlns", METS_NS)
        .attr("xmlns:xlink", XLINK_NS)
        .attr("xmlns:xsi", XSI_NS)
        .attr("xsi:schemaLocation", METS_SCHEMA_LOCATION)
        .attr("TYPE", "artifact-doe")
        .child(
            Element::new("mets:dmdSec")
                .attr("xmlns:mets", METS_NS)
                .attr("ID", "DMD")
                .child(
                    Element::new("mets:mdWrap")
                        .attr("MDTYPE", "MODS")
                        .child(Element::new("mets:xmlData").child(mods)),
                ),
        )
        .child(
            Element::new("mets:structMap")
                .attr("xmlns:mets", METS_NS)
                .child(Element::new("mets:div").text("")),
        );

    Document::new(root)
}

/// Top-level MODS children redeclare the `mods` prefix.
fn mods_element(name: &str) -> Element {
    Element::new(name).attr("xmlns:mods", MODS_NS)
}

fn author_name(author: &AuthorEntry) -> Element {
    let name_part = |kind: &str, value: String| {
        Element::new("mods:namePart").attr("type", kind).text(value)
    };
    mods_element("mods:name")
        .attr("ID", format!("artseq-{}", author.anchor()))
        .child(name_part("given", author.given_name()))
        .child(name_part("family", author.last_name.clone()))
        .child(name_part("termsOfAddress", String::new()))
        .child(Element::new("mods:displayForm").text(author.display_name()))
        .child(
            Element::new("mods:nameIdentifier")
                .attr("type", "ORCID")
                .text(&author.orcid),
        )
        .child(Element::new("mods:role").child(Element::new("mods:roleTerm").text("Contributor")))
        .child(
            Element::new("mods:nameIdentifier")
                .attr("type", "email")
                .text(&author.email),
        )
        .child(Element::new("mods:affiliation").text(&author.affiliation))
}

fn badge_subject(topics: Vec<&BadgeDef>) -> Element {
    mods_element("mods:subject")
        .attr("authority", "reproducibility-types")
        .attr("ID", "badges")
        .children(topics.into_iter().map(|badge| {
            Element::new("mods:topic")
                .attr("authority", &badge.authority)
                .text(&badge.label)
        }))
}

fn do_extensions(config: &DepositConfig, artifact: &Doi) -> Element {
    let description = format!(
        "<p>Artifact appendix item for {}</p>",
        escape_html(&config.proceeding_name)
    );
    let empty = |name: &str| Element::new(name);

    Element::new("atpn:do-extensions")
        .attr("xmlns:atpn", ATPN_NS)
        .attr("xsi:schemaLocation", ATPN_SCHEMA_LOCATION)
        .child(Element::new("atpn:description").cdata(description))
        .child(Element::new("atpn:copyright").text("Author(s)"))
        .child(Element::new("atpn:version").text("1.0"))
        .children(
            [
                "atpn:softwareDependencies",
                "atpn:hardwareDependencies",
                "atpn:installation",
                "atpn:otherInstructions",
                "atpn:eiInstallation",
                "atpn:eiParameterization",
                "atpn:eiEvaluation",
                "atpn:eiWorkflow",
                "atpn:eiOtherInstructions",
                "atpn:dataDocumentation",
            ]
            .into_iter()
            .map(empty),
        )
        .child(Element::new("atpn:provenance").text(""))
        .child(Element::new("atpn:accessCondition").text("free"))
        .child(Element::new("atpn:licenseUrl"))
        .child(
            Element::new("atpn:keywords")
                .attr("nested-label", "NONE")
                .text(""),
        )
        .child(
            Element::new("atpn:baseDoi").text(format!("{}/artifact-doe-class", artifact.prefix())),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::xml::render_string;

    fn author(sequence: u32, first: &str, last: &str) -> AuthorEntry {
        AuthorEntry {
            sequence,
            prefix: String::new(),
            first_name: first.into(),
            middle_name: String::new(),
            last_name: last.into(),
            suffix: String::new(),
            email: format!("{}@example.org", first.to_lowercase()),
            orcid: format!("0000-0001-0000-000{sequence}"),
            affiliation: "Example University".into(),
        }
    }

    fn record() -> PaperRecord {
        PaperRecord {
            key: "ppopp23-p42".into(),
            title: "Fast Caches".into(),
            authors: vec![author(1, "Ana", "Lee"), author(2, "Bo", "Kim")],
        }
    }

    fn mods(doc: &Document) -> &Element {
        doc.root()
            .find_path("mets:dmdSec/mets:mdWrap/mets:xmlData/mods")
            .unwrap()
    }

    fn build(config: &DepositConfig, badges: &BadgeSet) -> Document {
        let record = record();
        let artifact = Doi::parse("https://doi.org/10.1145/zenodo.999").unwrap();
        let paper = Doi::parse("10.1145/3456789").unwrap();
        build_metadata(
            config,
            MetadataInput {
                record: &record,
                artifact_doi: &artifact,
                paper_doi: &paper,
                badges,
            },
        )
    }

    #[test]
    fn identifiers_are_not_confused() {
        let doc = build(&test_config(), &BadgeSet::default());
        let mods = mods(&doc);
        assert_eq!(
            mods.find("mods:identifier").unwrap().text_content(),
            "10.1145/zenodo.999"
        );
        assert_eq!(
            mods.find("mods:relatedItem").unwrap().attr_value("xlink:href"),
            Some("10.1145/3456789")
        );
        assert_eq!(
            mods.find_path("mods:extension/atpn:do-extensions/atpn:baseDoi")
                .unwrap()
                .text_content(),
            "10.1145/artifact-doe-class"
        );
    }

    #[test]
    fn related_article_can_be_disabled() {
        let mut cfg = test_config();
        cfg.related_article = false;
        let doc = build(&cfg, &BadgeSet::default());
        assert!(mods(&doc).find("mods:relatedItem").is_none());
    }

    #[test]
    fn author_blocks() {
        let doc = build(&test_config(), &BadgeSet::default());
        let names: Vec<&Element> = mods(&doc)
            .elements()
            .filter(|e| e.name() == "mods:name")
            .collect();
        assert_eq!(names.len(), 2);
        assert_eq!(names[0].attr_value("ID"), Some("artseq-0"));
        assert_eq!(names[1].attr_value("ID"), Some("artseq-1"));
        let rendered = render_string(&doc);
        assert!(rendered.contains(
            "    <mods:name xmlns:mods=\"http://www.loc.gov/mods/v3\" ID=\"artseq-0\">\n"
        ));
        assert!(rendered.contains("<mods:namePart type=\"given\">Ana</mods:namePart>\n"));
        assert!(rendered.contains("<mods:namePart type=\"termsOfAddress\"></mods:namePart>\n"));
        assert!(rendered.contains("<mods:displayForm>Ana Lee</mods:displayForm>\n"));
        assert!(rendered.contains("<mods:roleTerm>Contributor</mods:roleTerm>\n"));
        assert!(rendered.contains(
            "<mods:nameIdentifier type=\"email\">ana@example.org</mods:nameIdentifier>\n"
        ));
    }

    #[test]
    fn badges_in_table_order() {
        let badges: BadgeSet = ["#acm:artifacts-functional", "#acm:artifacts-available"]
            .into_iter()
            .collect();
        let doc = build(&test_config(), &badges);
        let subject = mods(&doc)
            .elements()
            .find(|e| e.attr_value("ID") == Some("badges"))
            .unwrap();
        let labels: Vec<String> = subject.elements().map(Element::text_content).collect();
        assert_eq!(
            labels,
            vec!["Artifacts Available", "Artifacts Evaluated — Functional"]
        );
    }

    #[test]
    fn extension_block_and_trailer() {
        let mut cfg = test_config();
        cfg.proceeding_name = "R&D'23".into();
        let doc = build(&cfg, &BadgeSet::default());
        let ext = mods(&doc)
            .find_path("mods:extension/atpn:do-extensions")
            .unwrap();
        assert_eq!(ext.elements().count(), 19);
        assert_eq!(
            ext.find("atpn:description").unwrap().text_content(),
            "<p>Artifact appendix item for R&amp;D&#x27;23</p>"
        );
        assert_eq!(
            mods(&doc)
                .find_path("mods:originInfo/mods:dateIssued")
                .unwrap()
                .text_content(),
            "2023-01-06"
        );

        let rendered = render_string(&doc);
        assert!(rendered.ends_with(
            "  <mets:structMap xmlns:mets=\"http://www.loc.gov/METS/\">\n    <mets:div></mets:div>\n  </mets:structMap>\n</mets>\n"
        ));
        assert!(rendered.contains("<mods:subTitle/>\n"));
        assert!(rendered.contains("<atpn:licenseUrl/>\n"));
        assert!(rendered.contains("<atpn:keywords nested-label=\"NONE\"></atpn:keywords>\n"));
    }

    #[test]
    fn description_cdata_keeps_its_own_line() {
        let rendered = render_string(&build(&test_config(), &BadgeSet::default()));
        let pad = " ".repeat(14);
        let expected = format!(
            "{pad}<atpn:description>\n{pad}  <![CDATA[<p>Artifact appendix item for PPoPP23</p>]]>\n{pad}</atpn:description>\n"
        );
        assert!(rendered.contains(&expected), "{rendered}");
    }
}
