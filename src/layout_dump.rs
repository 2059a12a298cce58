use crate::layout::FlowView;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub bounds: [f64; 4],
    pub chapters: Vec<String>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub scene_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub chapter: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub from: [f64; 2],
    pub to: [f64; 2],
    pub label: Option<String>,
    pub label_anchor: Option<[f64; 2]>,
}

impl LayoutDump {
    pub fn from_view(view: &FlowView) -> Self {
        let nodes = view
            .nodes
            .iter()
            .map(|node| NodeDump {
                scene_id: node.scene_id.clone(),
                title: node.title.clone(),
                kind: node.kind.as_str().to_string(),
                chapter: node.chapter.clone(),
                x: node.rect.x,
                y: node.rect.y,
                width: node.rect.width,
                height: node.rect.height,
            })
            .collect();

        let edges = view
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.edge_id.clone(),
                kind: edge.kind.as_str().to_string(),
                from: [edge.from.x, edge.from.y],
                to: [edge.to.x, edge.to.y],
                label: edge.label.clone(),
                label_anchor: edge
                    .label
                    .as_ref()
                    .map(|_| [edge.label_anchor.x, edge.label_anchor.y]),
            })
            .collect();

        let b = view.bounds;
        LayoutDump {
            bounds: [b.x, b.y, b.width, b.height],
            chapters: view.chapters.clone(),
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(output: Option<&Path>, view: &FlowView) -> anyhow::Result<()> {
    let dump = LayoutDump::from_view(view);
    match output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, &dump)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}
