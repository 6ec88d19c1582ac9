use std::io::{self, Write};

use sp_ast::PreprocOptions;

/// The four import groups, in emission order: core, user, code folder,
/// default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSet {
    groups: [Vec<String>; 4],
}

impl ImportSet {
    pub fn new(
        options: &PreprocOptions,
        user_imports: &[String],
        code_folder_packages: &[String],
    ) -> Self {
        Self {
            groups: [
                options.core_imports.clone(),
                user_imports.to_vec(),
                code_folder_packages
                    .iter()
                    .map(|pkg| format!("{pkg}.*"))
                    .collect(),
                options.default_import_list(),
            ],
        }
    }

    /// One `import x;` line per entry, and a blank line after each non-empty
    /// group. Returns the number of lines written.
    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        let mut lines = 0;
        for group in self.groups.iter().filter(|g| !g.is_empty()) {
            for item in group {
                writeln!(out, "import {item};")?;
            }
            writeln!(out)?;
            lines += group.len() + 1;
        }
        Ok(lines)
    }
}
