//! One-line style hints shown next to each style option in the quiz.

const GENERIC_HINT: &str = "Classic architectural style with distinctive features";

/// (style label, visual cues) pairs. Covers every style in the catalog and the usual distractors.
const STYLE_HINTS: &[(&str, &str)] = &[
  ("Gothic", "Pointed arches, flying buttresses, ribbed vaults, vertical emphasis, large stained glass windows"),
  ("Ancient Greek", "Columns (Doric, Ionic, Corinthian), pediments, symmetry, temples, marble construction"),
  ("Ancient Roman", "Arches, concrete, domes, vaults, aqueducts, amphitheaters, engineering innovation"),
  ("Renaissance", "Classical revival, symmetry, proportion, domes, columns, human-centered design"),
  ("Baroque", "Dramatic curves, ornate decoration, gilding, theatrical lighting, emotional intensity"),
  ("Islamic", "Domes, minarets, geometric patterns, calligraphy, courtyards, horseshoe arches"),
  ("Byzantine", "Large domes, mosaics, pendentives, rich colors, centralized plans, religious focus"),
  ("Romanesque", "Round arches, thick walls, small windows, barrel vaults, fortress-like, heavy appearance"),
  ("Art Nouveau", "Organic forms, flowing lines, nature motifs, curved shapes, decorative ironwork"),
  ("Art Deco", "Geometric patterns, streamlined forms, zigzags, chrome, symmetry, luxury materials"),
  ("Modernist", "Function over form, flat roofs, open plans, glass walls, minimal decoration, steel/concrete"),
  ("Brutalist", "Raw concrete, massive forms, repetitive modules, fortress-like, honest materials"),
  ("Neoclassical", "Greek/Roman revival, columns, pediments, symmetry, grandeur, civic buildings"),
  ("Contemporary", "Innovative forms, sustainable materials, technology integration, experimental structures"),
  // Distractors
  ("Neo-Gothic", "Gothic revival from 19th century, pointed arches, elaborate tracery, romantic medievalism"),
  ("Norman", "Early English Romanesque, round arches, thick walls, castle-like towers"),
  ("Hellenistic", "Later Greek period, more ornate than Classical, larger scale, dramatic poses"),
  ("Corinthian", "Most ornate Greek order, elaborate capitals with acanthus leaves"),
  ("Doric", "Simplest Greek order, sturdy columns, no base, plain capitals"),
  ("Ionic", "Greek order with scroll capitals (volutes), more slender than Doric"),
  ("Perpendicular Gothic", "Late English Gothic, vertical lines, fan vaults, large windows"),
  ("Early Gothic", "Transitional period, early pointed arches, less elaborate than High Gothic"),
  ("High Gothic", "Peak Gothic period, soaring height, elaborate decoration, structural innovation"),
  ("Mannerist", "Between Renaissance & Baroque, rule-breaking, elongated forms, complex"),
  ("Rococo", "Late Baroque, lighter, more playful, pastel colors, asymmetrical curves"),
  ("Palladian", "Based on Palladio works, symmetrical villas, classical proportions"),
  ("Gothic Revival", "19th century revival of Gothic, romantic, ecclesiastical focus"),
  ("Etruscan", "Pre-Roman Italian, arches, terracotta decoration"),
  ("Imperial", "Roman imperial period, monumental scale, engineering prowess"),
  ("Bauhaus", "German modernist school, function follows form, clean lines, no ornament"),
  ("International Style", "Modernist, glass and steel, flat roofs, no decoration, universal aesthetic"),
  ("Streamline Moderne", "Art Deco evolution, aerodynamic curves, horizontal lines, machine aesthetic"),
  ("Postmodern", "Reaction to Modernism, historical references, irony, decoration returns"),
  ("Deconstructivism", "Fragmented forms, non-rectilinear shapes, visual complexity"),
  ("High-Tech", "Exposed structure, industrial materials, technology celebration"),
  ("Expressionism", "Emotional forms, distorted shapes, dramatic effects"),
  ("Functionalist", "Form follows function, no ornament, practical design"),
  ("Minimalist", "Extreme simplicity, essential elements only, pure forms"),
  ("Metabolist", "Japanese movement, organic growth, modular megastructures"),
  ("Neo-Futurism", "Futuristic curves, advanced technology, dynamic forms"),
  ("Modernisme", "Catalan Art Nouveau, organic forms, colorful decoration"),
  ("Jugendstil", "German/Austrian Art Nouveau, geometric Art Nouveau"),
  ("Secession Style", "Viennese Art Nouveau breakaway movement"),
  ("Arts and Crafts", "Handcrafted quality, medieval inspiration, honest materials"),
  ("Beaux-Arts", "French classical, grand scale, elaborate decoration, symmetry"),
  ("Prairie School", "Frank Lloyd Wright, horizontal lines, open plans, nature integration"),
  ("Greek Revival", "Pure Greek temple forms, columns, pediments"),
  ("Victorian", "Eclectic 19th century, ornate, varied historical styles"),
  ("Moorish", "North African Islamic style, horseshoe arches, geometric patterns"),
  ("Ottoman", "Turkish Islamic, large domes, pencil minarets"),
  ("Mudejar", "Spanish Christian-Islamic fusion, brick, geometric decoration"),
  ("Carolingian", "Charlemagne era, revival of Roman forms"),
  ("Empire", "French Neoclassical under Napoleon, imperial Roman references"),
  ("Early Christian", "Roman basilica form adapted for churches"),
  ("Armenian", "Armenian Christian, conical domes, stone carving"),
];

/// Visual cues for a style label; a generic line for labels we don't know.
pub fn style_hint(style: &str) -> &'static str {
  STYLE_HINTS
    .iter()
    .find(|(label, _)| *label == style)
    .map(|(_, hint)| *hint)
    .unwrap_or(GENERIC_HINT)
}
