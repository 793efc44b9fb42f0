//! Rendering into an existing DOCX template.
//!
//! Every part of the template is kept. The generated body goes in front of
//! the template's final section properties, and the generated
//! relationships, media and content types are merged into the template's
//! own parts.

use super::docx::{
    media_defaults, relationships_xml, write_content_default, write_package, DocxRenderer,
    CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART, NS_CONTENT_TYPES, NS_PACKAGE_RELS,
    NS_R, NS_W,
};
use super::xml::XmlPart;
use super::DocxOptions;
use crate::config::PageGeometry;
use crate::detect::ensure_docx;
use crate::error::{Error, Result};
use crate::layout::inches_from_twips;
use crate::model::ReportDocument;
use roxmltree::{Document, Node};
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// Relationship id prefix for parts added to a template.
const TEMPLATE_REL_PREFIX: &str = "rIdPw";

/// A DOCX template held in memory.
#[derive(Debug, Clone)]
pub struct DocxTemplate {
    parts: Vec<(String, Vec<u8>)>,
}

impl DocxTemplate {
    /// Load a template from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        ensure_docx(path)?;
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
            .map_err(|e| Error::Template(format!("{}: {}", path.display(), e)))
    }

    /// Load a template from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut bytes = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut bytes)?;
            parts.push((file.name().to_string(), bytes));
        }

        let template = Self { parts };
        if template.part(DOCUMENT_PART).is_none() {
            return Err(Error::Template(format!("{} not found", DOCUMENT_PART)));
        }
        Ok(template)
    }

    fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    fn part_str(&self, name: &str) -> Result<Option<&str>> {
        match self.part(name) {
            Some(data) => std::str::from_utf8(data)
                .map(Some)
                .map_err(|e| Error::Template(format!("{} is not UTF-8: {}", name, e))),
            None => Ok(None),
        }
    }

    fn document_xml(&self) -> Result<&str> {
        self.part_str(DOCUMENT_PART)?
            .ok_or_else(|| Error::Template(format!("{} not found", DOCUMENT_PART)))
    }

    /// Overwrite the page height and vertical margins with the values of
    /// the template's final section. Returns whether anything was found.
    pub fn apply_geometry(&self, page: &mut PageGeometry) -> Result<bool> {
        let xml = self.document_xml()?;
        let doc = Document::parse(xml)?;
        let Some(sect) = final_section(&doc) else {
            return Ok(false);
        };

        let mut found = false;
        let mut read = |element: &str, attr: &str, target: &mut f64| {
            let value = sect
                .children()
                .find(|n| n.has_tag_name((NS_W, element)))
                .and_then(|n| n.attribute((NS_W, attr)))
                .and_then(|v| v.trim().parse::<i64>().ok());
            if let Some(twips) = value {
                *target = inches_from_twips(twips);
                found = true;
            }
        };
        read("pgSz", "h", &mut page.height);
        read("pgMar", "top", &mut page.margin_top);
        read("pgMar", "bottom", &mut page.margin_bottom);

        if found {
            log::debug!(
                "Template page: height {:.2} in, margins {:.2}/{:.2} in",
                page.height,
                page.margin_top,
                page.margin_bottom
            );
        }
        Ok(found)
    }

    /// Render a document into a copy of this template.
    pub fn render(&self, report: &ReportDocument, options: &DocxOptions) -> Result<Vec<u8>> {
        let document_xml = self.document_xml()?;
        let rels_xml = self.part_str(DOCUMENT_RELS_PART)?;
        let types_xml = self
            .part_str(CONTENT_TYPES_PART)?
            .ok_or_else(|| Error::Template(format!("{} not found", CONTENT_TYPES_PART)))?;

        let first_rel = match rels_xml {
            Some(xml) => next_relationship_number(xml, TEMPLATE_REL_PREFIX)?,
            None => 1,
        };
        let options = options.clone().with_rel_prefix(TEMPLATE_REL_PREFIX);
        let body = DocxRenderer::new(options).render_body(report, first_rel)?;

        let document_xml = insert_body(document_xml, &body.xml)?;
        let rels_xml = match rels_xml {
            Some(xml) => {
                let mut added = XmlPart::fragment();
                for rel in &body.relationships {
                    rel.write_xml(&mut added)?;
                }
                append_before_close(xml, "</Relationships>", &added.finish()?)?
            }
            None => relationships_xml(&body.relationships)?,
        };
        let types_xml = merge_content_types(types_xml, &body.media)?;

        let mut parts: Vec<(String, Vec<u8>)> = Vec::with_capacity(self.parts.len() + 1);
        for (name, data) in &self.parts {
            let data = match name.as_str() {
                DOCUMENT_PART => document_xml.as_bytes().to_vec(),
                DOCUMENT_RELS_PART => rels_xml.as_bytes().to_vec(),
                CONTENT_TYPES_PART => types_xml.as_bytes().to_vec(),
                _ => data.clone(),
            };
            parts.push((name.clone(), data));
        }
        if self.part(DOCUMENT_RELS_PART).is_none() {
            parts.push((DOCUMENT_RELS_PART.to_string(), rels_xml.into_bytes()));
        }
        for media in body.media {
            if self.part(&media.part_name()).is_some() {
                return Err(Error::Template(format!(
                    "template already contains {}",
                    media.part_name()
                )));
            }
            parts.push((media.part_name(), media.data));
        }

        write_package(&parts)
    }
}

fn body_node<'a, 'input>(doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
    doc.root_element()
        .children()
        .find(|n| n.has_tag_name((NS_W, "body")))
}

fn final_section<'a, 'input>(doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
    body_node(doc)?
        .children()
        .filter(|n| n.is_element())
        .last()
        .filter(|n| n.has_tag_name((NS_W, "sectPr")))
}

/// Insert body content before the final `w:sectPr` (or at the end of the
/// body) and declare the relationships namespace on the root if needed.
fn insert_body(xml: &str, content: &str) -> Result<String> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if root.lookup_prefix(NS_W) != Some("w") {
        return Err(Error::Template(
            "document.xml does not bind the w prefix to WordprocessingML".to_string(),
        ));
    }

    let body = body_node(&doc)
        .ok_or_else(|| Error::Template("document.xml has no w:body".to_string()))?;
    let insert_at = match final_section(&doc) {
        Some(sect) => sect.range().start,
        None => {
            let end = body.range().end;
            xml[..end]
                .rfind("</")
                .filter(|pos| *pos > body.range().start)
                .ok_or_else(|| Error::Template("w:body is empty-element".to_string()))?
        }
    };

    let mut out = String::with_capacity(xml.len() + content.len() + 128);
    let root_start = root.range().start;
    let name_end = xml[root_start..]
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .map(|i| root_start + i)
        .ok_or_else(|| Error::Template("malformed root element".to_string()))?;

    match root.lookup_namespace_uri(Some("r")) {
        Some(uri) if uri == NS_R => out.push_str(&xml[..insert_at]),
        Some(other) => {
            return Err(Error::Template(format!(
                "document.xml binds the r prefix to {}",
                other
            )))
        }
        None => {
            out.push_str(&xml[..name_end]);
            out.push_str(" xmlns:r=\"");
            out.push_str(NS_R);
            out.push('"');
            out.push_str(&xml[name_end..insert_at]);
        }
    }
    out.push_str(content);
    out.push_str(&xml[insert_at..]);
    Ok(out)
}

/// One past the highest `<prefix>N` relationship id in a relationships part.
fn next_relationship_number(xml: &str, prefix: &str) -> Result<u32> {
    let doc = Document::parse(xml)?;
    let highest = doc
        .descendants()
        .filter(|n| n.has_tag_name((NS_PACKAGE_RELS, "Relationship")))
        .filter_map(|n| n.attribute("Id"))
        .filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    Ok(highest + 1)
}

fn merge_content_types(xml: &str, media: &[super::MediaPart]) -> Result<String> {
    let doc = Document::parse(xml)?;
    let existing: Vec<String> = doc
        .descendants()
        .filter(|n| n.has_tag_name((NS_CONTENT_TYPES, "Default")))
        .filter_map(|n| n.attribute("Extension"))
        .map(|e| e.to_ascii_lowercase())
        .collect();

    let mut additions = XmlPart::fragment();
    for (ext, content_type) in media_defaults(media) {
        if !existing.contains(&ext) {
            write_content_default(&mut additions, &ext, &content_type)?;
        }
    }
    append_before_close(xml, "</Types>", &additions.finish()?)
}

fn append_before_close(xml: &str, close: &str, content: &str) -> Result<String> {
    let pos = xml
        .rfind(close)
        .ok_or_else(|| Error::Template(format!("missing {}", close)))?;
    let mut out = String::with_capacity(xml.len() + content.len());
    out.push_str(&xml[..pos]);
    out.push_str(content);
    out.push_str(&xml[pos..]);
    Ok(out)
}
