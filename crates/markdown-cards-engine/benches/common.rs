// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_note(sections: usize) -> String {
    let mut content = String::from("---\ncover: \"[[cover.png]]\"\ntags: [bench]\n---\n# Note\n\n");
    for section in 0..sections {
        content.push_str(&format!("## Section {section}\n\n"));
        content.push_str("Paragraph with a [[link]] and `inline ![[code.png]]` text.\n\n");
        content.push_str(&format!("![[images/figure-{section}.png|300]]\n\n"));
        content.push_str("```rust\nlet embed = \"![[not-an-embed.png]]\";\n```\n\n");
        content.push_str(&format!("![diagram](assets/diagram%20{section}.svg \"Diagram\")\n\n"));
        if section % 5 == 0 {
            content.push_str("    ![[indented.png]]\n\n");
            content.push_str("```cardlink\nurl: https://example.com\nimage: https://example.com/og.png\n```\n\n");
        }
        if section % 7 == 0 {
            content.push_str("![](https://www.youtube.com/watch?v=dQw4w9WgXcQ)\n\n");
        }
    }
    content
}
