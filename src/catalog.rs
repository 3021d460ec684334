//! A catalog of well-known Graphviz attribute names.
//!
//! The parser and model accept any key; this module only answers advisory
//! questions, so a misspelled `colour` can be flagged before the text ever
//! reaches a layout engine.

use crate::attr::AttributeStore;

/// Coarse value shape expected by a known attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Enum,
}

/// The expected value shape for `name`, or `None` when the attribute is
/// not in the catalog.
pub fn kind_of(name: &str) -> Option<ValueKind> {
    use ValueKind::*;
    let kind = match name {
        "label" | "xlabel" | "headlabel" | "taillabel" | "tooltip" | "comment" | "fontname"
        | "fontpath" | "group" | "image" | "imagepath" | "href" | "url" | "target" | "id"
        | "class" | "colorscheme" | "layer" | "layers" | "lheight" | "lwidth" | "samehead"
        | "sametail" | "stylesheet" | "xdotversion" => String,
        "color" | "bgcolor" | "fillcolor" | "fontcolor" | "labelfontcolor" | "pencolor"
        | "headport" | "tailport" | "lp" | "pos" | "size" | "viewport" | "margin" => String,
        "arrowsize" | "distortion" | "fontsize" | "height" | "width" | "labelangle"
        | "labeldistance" | "labelfontsize" | "len" | "minlen" | "nodesep" | "orientation"
        | "penwidth" | "ranksep" | "repulsiveforce" | "rotate" | "scale" | "sides" | "skew"
        | "weight" | "z" | "dpi" | "epsilon" | "esep" | "k" | "maxiter" | "mclimit"
        | "mindist" | "nslimit" | "nslimit1" | "pad" | "quantum" | "sep" | "sortv"
        | "voro_margin" => Number,
        "center" | "compound" | "concentrate" | "constraint" | "decorate" | "fixedsize"
        | "forcelabels" | "headclip" | "tailclip" | "labelfloat" | "landscape" | "newrank"
        | "nojustify" | "overlap" | "regular" | "remincross" | "splines" | "truecolor" => Boolean,
        "arrowhead" | "arrowtail" | "clusterrank" | "dir" | "imagescale" | "labeljust"
        | "labelloc" | "mode" | "model" | "ordering" | "outputorder" | "pagedir" | "peripheries"
        | "quadtree" | "rank" | "rankdir" | "ratio" | "shape" | "smoothing" | "style" => Enum,
        _ => return None,
    };
    Some(kind)
}

pub fn is_known(name: &str) -> bool {
    kind_of(name).is_some()
}

/// The keys in `store` that the catalog does not recognize, in store
/// order. Matching is case-sensitive, like Graphviz itself.
pub fn check_keys(store: &AttributeStore) -> Vec<&str> {
    store
        .iter()
        .map(|(key, _)| key)
        .filter(|key| !is_known(key))
        .collect()
}
