//! WordprocessingML package writer.

use super::xml::XmlPart;
use super::DocxOptions;
use crate::error::{Error, Result};
use crate::layout::{emu_from_inches, twips_from_inches};
use crate::model::{
    Alignment, Block, HeightRule, InlineContent, LinkTarget, Metadata, Paragraph, ParagraphStyle,
    ReportDocument, Resource, Table, TableCell, TableRow, TextRun, TextStyle, VerticalAlignment,
};
use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub(crate) const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const NS_R: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
pub(crate) const NS_PACKAGE_RELS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
pub(crate) const NS_CONTENT_TYPES: &str =
    "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_CORE: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";

const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";

pub(crate) const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
pub(crate) const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Write a document to a new DOCX package.
pub fn to_docx(doc: &ReportDocument, options: &DocxOptions) -> Result<Vec<u8>> {
    DocxRenderer::new(options.clone()).render(doc)
}

/// Write a document to a DOCX file. The package is built in memory first,
/// so a failed render leaves no partial file behind.
pub fn write_docx<P: AsRef<Path>>(doc: &ReportDocument, options: &DocxOptions, path: P) -> Result<()> {
    let data = to_docx(doc, options)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// A package relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship id, e.g. `rId3`
    pub id: String,
    /// Relationship type URI
    pub rel_type: &'static str,
    /// Target part or URL
    pub target: String,
    /// Target is outside the package
    pub external: bool,
}

impl Relationship {
    /// Write as a `Relationship` element.
    pub(crate) fn write_xml(&self, xml: &mut XmlPart) -> Result<()> {
        let mut attributes = vec![
            ("Id", self.id.as_str()),
            ("Type", self.rel_type),
            ("Target", self.target.as_str()),
        ];
        if self.external {
            attributes.push(("TargetMode", "External"));
        }
        xml.empty("Relationship", &attributes)
    }
}

/// A media file stored under `word/media/`.
#[derive(Debug, Clone)]
pub struct MediaPart {
    /// File name inside the media folder
    pub name: String,
    /// MIME type
    pub content_type: String,
    /// File content
    pub data: Vec<u8>,
}

impl MediaPart {
    /// Full part name inside the package.
    pub fn part_name(&self) -> String {
        format!("word/media/{}", self.name)
    }

    /// File extension.
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or("bin")
    }
}

/// Body XML plus the parts it refers to.
#[derive(Debug, Clone, Default)]
pub struct RenderedBody {
    /// Children of `w:body`, without a section properties element
    pub xml: String,
    /// Hyperlink and image relationships of the body
    pub relationships: Vec<Relationship>,
    /// Images referenced by the body
    pub media: Vec<MediaPart>,
}

/// DOCX renderer.
pub struct DocxRenderer {
    options: DocxOptions,
}

impl DocxRenderer {
    /// Create a new DOCX renderer.
    pub fn new(options: DocxOptions) -> Self {
        Self { options }
    }

    /// Render a complete package.
    pub fn render(&self, doc: &ReportDocument) -> Result<Vec<u8>> {
        // rId1 is the styles part.
        let body = self.render_body(doc, 2)?;

        let styles = Relationship {
            id: format!("{}1", self.options.rel_prefix),
            rel_type: REL_STYLES,
            target: "styles.xml".to_string(),
            external: false,
        };
        let mut rels = vec![styles];
        rels.extend(body.relationships.iter().cloned());

        let mut parts: Vec<(String, Vec<u8>)> = vec![
            (
                CONTENT_TYPES_PART.to_string(),
                content_types_xml(&body.media)?.into_bytes(),
            ),
            ("_rels/.rels".to_string(), package_rels_xml()?.into_bytes()),
            (
                DOCUMENT_PART.to_string(),
                self.document_xml(&body.xml)?.into_bytes(),
            ),
            (
                DOCUMENT_RELS_PART.to_string(),
                relationships_xml(&rels)?.into_bytes(),
            ),
            ("word/styles.xml".to_string(), self.styles_xml()?.into_bytes()),
            (
                "docProps/core.xml".to_string(),
                core_properties_xml(&doc.metadata)?.into_bytes(),
            ),
        ];
        parts.extend(body.media.into_iter().map(|m| (m.part_name(), m.data)));

        write_package(&parts)
    }

    /// Render only the body content, numbering relationships from
    /// `first_rel`.
    pub fn render_body(&self, doc: &ReportDocument, first_rel: u32) -> Result<RenderedBody> {
        let mut writer = BodyWriter::new(doc, &self.options, first_rel);
        for block in &doc.blocks {
            writer.write_block(block)?;
        }
        writer.finish()
    }

    fn document_xml(&self, body: &str) -> Result<String> {
        let page = &self.options.page;
        let width = twips_from_inches(self.options.page_width).to_string();
        let height = twips_from_inches(page.height).to_string();
        let top = twips_from_inches(page.margin_top).to_string();
        let right = twips_from_inches(self.options.margin_right).to_string();
        let bottom = twips_from_inches(page.margin_bottom).to_string();
        let left = twips_from_inches(self.options.margin_left).to_string();

        let mut xml = XmlPart::document()?;
        xml.start(
            "w:document",
            &[
                ("xmlns:w", NS_W),
                ("xmlns:r", NS_R),
                ("xmlns:wp", NS_WP),
                ("xmlns:a", NS_A),
                ("xmlns:pic", NS_PIC),
            ],
        )?;
        xml.start("w:body", &[])?;
        xml.fragment_xml(body);
        xml.start("w:sectPr", &[])?;
        xml.empty("w:pgSz", &[("w:w", width.as_str()), ("w:h", height.as_str())])?;
        xml.empty(
            "w:pgMar",
            &[
                ("w:top", top.as_str()),
                ("w:right", right.as_str()),
                ("w:bottom", bottom.as_str()),
                ("w:left", left.as_str()),
                ("w:header", "720"),
                ("w:footer", "720"),
                ("w:gutter", "0"),
            ],
        )?;
        xml.end("w:sectPr")?;
        xml.end("w:body")?;
        xml.end("w:document")?;
        xml.finish()
    }

    fn styles_xml(&self) -> Result<String> {
        let font = self.options.font_name.as_str();
        let mut xml = XmlPart::document()?;
        xml.start("w:styles", &[("xmlns:w", NS_W)])?;

        xml.start("w:docDefaults", &[])?;
        xml.start("w:rPrDefault", &[])?;
        xml.start("w:rPr", &[])?;
        xml.empty(
            "w:rFonts",
            &[("w:ascii", font), ("w:hAnsi", font), ("w:cs", font)],
        )?;
        let size = half_points(self.options.font_size);
        xml.val("w:sz", size)?;
        xml.val("w:szCs", size)?;
        xml.val("w:lang", "en-US")?;
        xml.end("w:rPr")?;
        xml.end("w:rPrDefault")?;
        xml.start("w:pPrDefault", &[])?;
        xml.start("w:pPr", &[])?;
        xml.empty(
            "w:spacing",
            &[("w:after", "0"), ("w:line", "240"), ("w:lineRule", "auto")],
        )?;
        xml.end("w:pPr")?;
        xml.end("w:pPrDefault")?;
        xml.end("w:docDefaults")?;

        xml.start(
            "w:style",
            &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
        )?;
        xml.val("w:name", "Normal")?;
        xml.empty("w:qFormat", &[])?;
        xml.end("w:style")?;

        xml.start("w:style", &[("w:type", "character"), ("w:styleId", "Hyperlink")])?;
        xml.val("w:name", "Hyperlink")?;
        xml.start("w:rPr", &[])?;
        xml.val("w:color", "0563C1")?;
        xml.val("w:u", "single")?;
        xml.end("w:rPr")?;
        xml.end("w:style")?;

        xml.start(
            "w:style",
            &[("w:type", "table"), ("w:default", "1"), ("w:styleId", "TableNormal")],
        )?;
        xml.val("w:name", "Normal Table")?;
        xml.start("w:tblPr", &[])?;
        xml.empty("w:tblInd", &[("w:w", "0"), ("w:type", "dxa")])?;
        xml.start("w:tblCellMar", &[])?;
        for (side, width) in [("w:top", "0"), ("w:left", "108"), ("w:bottom", "0"), ("w:right", "108")] {
            xml.empty(side, &[("w:w", width), ("w:type", "dxa")])?;
        }
        xml.end("w:tblCellMar")?;
        xml.end("w:tblPr")?;
        xml.end("w:style")?;

        xml.start("w:style", &[("w:type", "table"), ("w:styleId", "TableGrid")])?;
        xml.val("w:name", "Table Grid")?;
        xml.val("w:basedOn", "TableNormal")?;
        xml.start("w:tblPr", &[])?;
        write_table_borders(&mut xml)?;
        xml.end("w:tblPr")?;
        xml.end("w:style")?;

        xml.end("w:styles")?;
        xml.finish()
    }
}

fn write_table_borders(xml: &mut XmlPart) -> Result<()> {
    xml.start("w:tblBorders", &[])?;
    for side in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
        xml.empty(
            side,
            &[
                ("w:val", "single"),
                ("w:sz", "4"),
                ("w:space", "0"),
                ("w:color", "000000"),
            ],
        )?;
    }
    xml.end("w:tblBorders")
}

/// Streams blocks into body XML and collects the relationships they need.
struct BodyWriter<'a> {
    doc: &'a ReportDocument,
    options: &'a DocxOptions,
    out: XmlPart,
    relationships: Vec<Relationship>,
    media: Vec<MediaPart>,
    hyperlinks: HashMap<String, String>,
    images: HashMap<String, String>,
    next_rel: u32,
    next_drawing: u32,
}

impl<'a> BodyWriter<'a> {
    fn new(doc: &'a ReportDocument, options: &'a DocxOptions, first_rel: u32) -> Self {
        Self {
            doc,
            options,
            out: XmlPart::fragment(),
            relationships: Vec::new(),
            media: Vec::new(),
            hyperlinks: HashMap::new(),
            images: HashMap::new(),
            next_rel: first_rel,
            next_drawing: 1,
        }
    }

    fn finish(self) -> Result<RenderedBody> {
        Ok(RenderedBody {
            xml: self.out.finish()?,
            relationships: self.relationships,
            media: self.media,
        })
    }

    fn add_relationship(&mut self, rel_type: &'static str, target: String, external: bool) -> String {
        let id = format!("{}{}", self.options.rel_prefix, self.next_rel);
        self.next_rel += 1;
        self.relationships.push(Relationship {
            id: id.clone(),
            rel_type,
            target,
            external,
        });
        id
    }

    fn hyperlink_rel(&mut self, url: &str) -> String {
        if let Some(id) = self.hyperlinks.get(url) {
            return id.clone();
        }
        let id = self.add_relationship(REL_HYPERLINK, url.to_string(), true);
        self.hyperlinks.insert(url.to_string(), id.clone());
        id
    }

    fn image_rel(&mut self, resource_id: &str, resource: &Resource) -> String {
        if let Some(id) = self.images.get(resource_id) {
            return id.clone();
        }
        let name = format!(
            "{}{}",
            self.options.media_prefix,
            resource.media_name(resource_id)
        );
        let id = self.add_relationship(REL_IMAGE, format!("media/{}", name), false);
        self.media.push(MediaPart {
            name,
            content_type: resource.mime_type.clone(),
            data: resource.data.clone(),
        });
        self.images.insert(resource_id.to_string(), id.clone());
        id
    }

    fn write_block(&mut self, block: &Block) -> Result<()> {
        match block {
            Block::Paragraph(p) => self.write_paragraph(p),
            Block::Table(t) => self.write_table(t),
            Block::PageBreak => {
                self.out.start("w:p", &[])?;
                self.out.start("w:r", &[])?;
                self.out.empty("w:br", &[("w:type", "page")])?;
                self.out.end("w:r")?;
                self.out.end("w:p")
            }
        }
    }

    fn write_paragraph(&mut self, para: &Paragraph) -> Result<()> {
        self.out.start("w:p", &[])?;
        self.write_paragraph_properties(&para.style)?;

        for item in &para.content {
            match item {
                InlineContent::Text(run) => self.write_run(run)?,
                InlineContent::Tab => {
                    self.out.start("w:r", &[])?;
                    self.out.empty("w:tab", &[])?;
                    self.out.end("w:r")?;
                }
                InlineContent::Link { run, target } => {
                    match target {
                        LinkTarget::External(url) => {
                            let id = self.hyperlink_rel(url);
                            self.out.start(
                                "w:hyperlink",
                                &[("r:id", id.as_str()), ("w:history", "1")],
                            )?;
                        }
                        LinkTarget::Anchor(name) => {
                            self.out.start(
                                "w:hyperlink",
                                &[("w:anchor", name.as_str()), ("w:history", "1")],
                            )?;
                        }
                    }
                    self.write_run(run)?;
                    self.out.end("w:hyperlink")?;
                }
                InlineContent::Image {
                    resource_id,
                    width,
                    height,
                } => self.write_image(resource_id, *width, *height)?,
                InlineContent::BookmarkStart { id, name } => {
                    let id = id.to_string();
                    self.out.empty(
                        "w:bookmarkStart",
                        &[("w:id", id.as_str()), ("w:name", name.as_str())],
                    )?;
                }
                InlineContent::BookmarkEnd { id } => {
                    let id = id.to_string();
                    self.out.empty("w:bookmarkEnd", &[("w:id", id.as_str())])?;
                }
            }
        }

        self.out.end("w:p")
    }

    fn write_paragraph_properties(&mut self, style: &ParagraphStyle) -> Result<()> {
        let has_spacing = style.space_before.is_some() || style.space_after.is_some();
        if !style.keep_with_next && !has_spacing && style.alignment == Alignment::Left {
            return Ok(());
        }

        self.out.start("w:pPr", &[])?;
        if style.keep_with_next {
            self.out.empty("w:keepNext", &[])?;
        }
        if has_spacing {
            let before = style.space_before.map(|p| points_to_twips(p).to_string());
            let after = style.space_after.map(|p| points_to_twips(p).to_string());
            let mut attributes = Vec::with_capacity(2);
            if let Some(before) = &before {
                attributes.push(("w:before", before.as_str()));
            }
            if let Some(after) = &after {
                attributes.push(("w:after", after.as_str()));
            }
            self.out.empty("w:spacing", &attributes)?;
        }
        if style.alignment != Alignment::Left {
            self.out.val("w:jc", justification(style.alignment))?;
        }
        self.out.end("w:pPr")
    }

    fn write_run(&mut self, run: &TextRun) -> Result<()> {
        if run.text.is_empty() {
            return Ok(());
        }

        // Tabs and newlines inside cell text become their own run children.
        let text = sanitize_text(&run.text);
        for (i, line) in text.split('\n').enumerate() {
            self.out.start("w:r", &[])?;
            write_run_properties(&mut self.out, &run.style)?;
            if i > 0 {
                self.out.empty("w:br", &[])?;
            }
            for (j, piece) in line.split('\t').enumerate() {
                if j > 0 {
                    self.out.empty("w:tab", &[])?;
                }
                if !piece.is_empty() {
                    self.out
                        .text_element("w:t", &[("xml:space", "preserve")], piece)?;
                }
            }
            self.out.end("w:r")?;
        }
        Ok(())
    }

    fn write_image(&mut self, resource_id: &str, width: f32, height: f32) -> Result<()> {
        let doc = self.doc;
        let resource = doc
            .get_resource(resource_id)
            .ok_or_else(|| Error::Render(format!("Missing image resource: {}", resource_id)))?;
        let rel = self.image_rel(resource_id, resource);
        let cx = emu_from_inches(width as f64).to_string();
        let cy = emu_from_inches(height as f64).to_string();
        let n = self.next_drawing.to_string();
        self.next_drawing += 1;
        let picture = format!("Picture {}", n);
        let media_name = resource.media_name(resource_id);
        let extent = [("cx", cx.as_str()), ("cy", cy.as_str())];

        let out = &mut self.out;
        out.start("w:r", &[])?;
        out.start("w:drawing", &[])?;
        out.start(
            "wp:inline",
            &[
                ("distT", "0"),
                ("distB", "0"),
                ("distL", "0"),
                ("distR", "0"),
                ("xmlns:wp", NS_WP),
                ("xmlns:a", NS_A),
            ],
        )?;
        out.empty("wp:extent", &extent)?;
        out.empty("wp:effectExtent", &[("l", "0"), ("t", "0"), ("r", "0"), ("b", "0")])?;
        out.empty("wp:docPr", &[("id", n.as_str()), ("name", picture.as_str())])?;
        out.start("wp:cNvGraphicFramePr", &[])?;
        out.empty("a:graphicFrameLocks", &[("noChangeAspect", "1")])?;
        out.end("wp:cNvGraphicFramePr")?;

        out.start("a:graphic", &[])?;
        out.start("a:graphicData", &[("uri", NS_PIC)])?;
        out.start("pic:pic", &[("xmlns:pic", NS_PIC)])?;
        out.start("pic:nvPicPr", &[])?;
        out.empty("pic:cNvPr", &[("id", n.as_str()), ("name", media_name.as_str())])?;
        out.empty("pic:cNvPicPr", &[])?;
        out.end("pic:nvPicPr")?;
        out.start("pic:blipFill", &[])?;
        out.empty("a:blip", &[("r:embed", rel.as_str())])?;
        out.start("a:stretch", &[])?;
        out.empty("a:fillRect", &[])?;
        out.end("a:stretch")?;
        out.end("pic:blipFill")?;
        out.start("pic:spPr", &[])?;
        out.start("a:xfrm", &[])?;
        out.empty("a:off", &[("x", "0"), ("y", "0")])?;
        out.empty("a:ext", &extent)?;
        out.end("a:xfrm")?;
        out.start("a:prstGeom", &[("prst", "rect")])?;
        out.empty("a:avLst", &[])?;
        out.end("a:prstGeom")?;
        out.end("pic:spPr")?;
        out.end("pic:pic")?;
        out.end("a:graphicData")?;
        out.end("a:graphic")?;

        out.end("wp:inline")?;
        out.end("w:drawing")?;
        out.end("w:r")
    }

    fn write_table(&mut self, table: &Table) -> Result<()> {
        let columns = table.column_count().max(1);
        let widths: Vec<f64> = if table.column_widths.len() == columns {
            table.column_widths.iter().map(|w| *w as f64).collect()
        } else {
            vec![self.options.text_width() / columns as f64; columns]
        };
        let total = twips_from_inches(widths.iter().sum()).to_string();

        self.out.start("w:tbl", &[])?;
        self.out.start("w:tblPr", &[])?;
        if table.borders {
            self.out.val("w:tblStyle", "TableGrid")?;
        }
        self.out
            .empty("w:tblW", &[("w:w", total.as_str()), ("w:type", "dxa")])?;
        if table.alignment != Alignment::Left {
            self.out.val("w:jc", justification(table.alignment))?;
        }
        if table.borders {
            write_table_borders(&mut self.out)?;
        }
        self.out.empty("w:tblLayout", &[("w:type", "fixed")])?;
        self.out.val("w:tblLook", "04A0")?;
        self.out.end("w:tblPr")?;

        self.out.start("w:tblGrid", &[])?;
        for w in &widths {
            let w = twips_from_inches(*w).to_string();
            self.out.empty("w:gridCol", &[("w:w", w.as_str())])?;
        }
        self.out.end("w:tblGrid")?;

        for row in &table.rows {
            self.write_row(row, &widths)?;
        }
        self.out.end("w:tbl")
    }

    fn write_row(&mut self, row: &TableRow, widths: &[f64]) -> Result<()> {
        self.out.start("w:tr", &[])?;
        if row.cant_split || row.height.is_some() || row.is_header {
            self.out.start("w:trPr", &[])?;
            if row.cant_split {
                self.out.empty("w:cantSplit", &[])?;
            }
            if let Some((height, rule)) = row.height {
                let rule = match rule {
                    HeightRule::Exact => "exact",
                    HeightRule::AtLeast => "atLeast",
                };
                let height = twips_from_inches(height as f64).to_string();
                self.out
                    .empty("w:trHeight", &[("w:val", height.as_str()), ("w:hRule", rule)])?;
            }
            if row.is_header {
                self.out.empty("w:tblHeader", &[])?;
            }
            self.out.end("w:trPr")?;
        }

        let mut column = 0;
        for cell in &row.cells {
            let span = cell.colspan.max(1) as usize;
            let end = (column + span).min(widths.len());
            let width: f64 = widths.get(column..end).map(|w| w.iter().sum()).unwrap_or(0.0);
            self.write_cell(cell, width)?;
            column += span;
        }
        self.out.end("w:tr")
    }

    fn write_cell(&mut self, cell: &TableCell, width: f64) -> Result<()> {
        let width = twips_from_inches(width).to_string();
        self.out.start("w:tc", &[])?;
        self.out.start("w:tcPr", &[])?;
        self.out
            .empty("w:tcW", &[("w:w", width.as_str()), ("w:type", "dxa")])?;
        if cell.colspan > 1 {
            self.out.val("w:gridSpan", cell.colspan)?;
        }
        match cell.vertical_alignment {
            VerticalAlignment::Top => {}
            VerticalAlignment::Middle => self.out.val("w:vAlign", "center")?,
            VerticalAlignment::Bottom => self.out.val("w:vAlign", "bottom")?,
        }
        self.out.end("w:tcPr")?;

        // A cell must end with a paragraph.
        if cell.content.is_empty() {
            self.out.empty("w:p", &[])?;
        }
        for p in &cell.content {
            self.write_paragraph(p)?;
        }
        self.out.end("w:tc")
    }
}

fn write_run_properties(xml: &mut XmlPart, style: &TextStyle) -> Result<()> {
    if !style.has_styling() {
        return Ok(());
    }
    xml.start("w:rPr", &[])?;
    if let Some(font) = &style.font_name {
        let font = font.as_str();
        xml.empty(
            "w:rFonts",
            &[("w:ascii", font), ("w:hAnsi", font), ("w:cs", font)],
        )?;
    }
    if style.bold {
        xml.empty("w:b", &[])?;
        xml.empty("w:bCs", &[])?;
    }
    if style.italic {
        xml.empty("w:i", &[])?;
        xml.empty("w:iCs", &[])?;
    }
    if style.all_caps {
        xml.empty("w:caps", &[])?;
    }
    if let Some(color) = &style.color {
        xml.val("w:color", color)?;
    }
    if let Some(size) = style.font_size {
        let hp = half_points(size);
        xml.val("w:sz", hp)?;
        xml.val("w:szCs", hp)?;
    }
    if style.underline {
        xml.val("w:u", "single")?;
    }
    xml.end("w:rPr")
}

fn justification(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justify => "both",
    }
}

fn half_points(points: f32) -> u32 {
    (points * 2.0).round().max(1.0) as u32
}

fn points_to_twips(points: f32) -> u32 {
    (points * 20.0).round().max(0.0) as u32
}

/// Drop characters XML 1.0 cannot carry and normalize line endings.
fn sanitize_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .map(|c| if c == '\r' { '\n' } else { c })
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

fn package_rels_xml() -> Result<String> {
    let rels = [
        Relationship {
            id: "rId1".to_string(),
            rel_type: REL_OFFICE_DOCUMENT,
            target: DOCUMENT_PART.to_string(),
            external: false,
        },
        Relationship {
            id: "rId2".to_string(),
            rel_type: REL_CORE_PROPERTIES,
            target: "docProps/core.xml".to_string(),
            external: false,
        },
    ];
    relationships_xml(&rels)
}

/// Serialize a relationships part.
pub(crate) fn relationships_xml(rels: &[Relationship]) -> Result<String> {
    let mut xml = XmlPart::document()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    for rel in rels {
        rel.write_xml(&mut xml)?;
    }
    xml.end("Relationships")?;
    xml.finish()
}

/// `Default` entries for the media extensions in use.
pub(crate) fn media_defaults(media: &[MediaPart]) -> BTreeMap<String, String> {
    media
        .iter()
        .map(|m| (m.extension().to_ascii_lowercase(), m.content_type.clone()))
        .collect()
}

/// Write a content types `Default` element.
pub(crate) fn write_content_default(
    xml: &mut XmlPart,
    extension: &str,
    content_type: &str,
) -> Result<()> {
    xml.empty(
        "Default",
        &[("Extension", extension), ("ContentType", content_type)],
    )
}

fn content_types_xml(media: &[MediaPart]) -> Result<String> {
    let mut xml = XmlPart::document()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    write_content_default(&mut xml, "rels", CT_RELS)?;
    write_content_default(&mut xml, "xml", "application/xml")?;
    for (ext, content_type) in media_defaults(media) {
        write_content_default(&mut xml, &ext, &content_type)?;
    }
    for (part, content_type) in [
        ("/word/document.xml", CT_DOCUMENT),
        ("/word/styles.xml", CT_STYLES),
        ("/docProps/core.xml", CT_CORE),
    ] {
        xml.empty(
            "Override",
            &[("PartName", part), ("ContentType", content_type)],
        )?;
    }
    xml.end("Types")?;
    xml.finish()
}

fn core_properties_xml(metadata: &Metadata) -> Result<String> {
    let mut xml = XmlPart::document()?;
    xml.start(
        "cp:coreProperties",
        &[
            ("xmlns:cp", NS_CORE),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    let fields = [
        ("dc:title", &metadata.title),
        ("dc:subject", &metadata.subject),
        ("dc:creator", &metadata.creator),
    ];
    for (tag, value) in fields {
        if let Some(value) = value {
            xml.text_element(tag, &[], value)?;
        }
    }
    if let Some(created) = metadata.created {
        let created = created.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        xml.text_element(
            "dcterms:created",
            &[("xsi:type", "dcterms:W3CDTF")],
            &created,
        )?;
    }
    xml.end("cp:coreProperties")?;
    xml.finish()
}

/// Zip the given parts, in order, into a package.
pub(crate) fn write_package(parts: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in parts {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(data)?;
    }
    Ok(zip.finish()?.into_inner())
}
