use crate::designs::Template;
use anyhow::{anyhow, Context, Result};
use std::io::{BufRead, BufReader, Read};

/// A reader for template files.
///
/// A template file is a stack of `order × order` grids of bit characters,
/// one row per line; blank lines between layers are ignored. The order is
/// inferred from the first row, every row must have that width, and the
/// total row count must split evenly into layers.
///
/// # Example
///
/// ```
/// # use molsat::io::TemplateReader;
/// let content = "10\n01\n\n11\n00\n";
/// let template = TemplateReader::default()
///     .read(&mut content.as_bytes())
///     .expect("invalid template file");
/// assert_eq!(2, template.order());
/// assert_eq!(2, template.n_layers());
/// ```
#[derive(Default)]
pub struct TemplateReader;

impl TemplateReader {
    /// Reads a template, inferring the order from the first row.
    pub fn read(&self, reader: &mut dyn Read) -> Result<Template> {
        let rows = self.read_rows(reader, None)?;
        if rows.is_empty() {
            return Err(anyhow!("the template file holds no rows"));
        }
        let order = rows[0].len();
        let mut template = Template::new(order);
        self.push_layers(&mut template, rows)?;
        Ok(template)
    }

    /// Reads a template file and appends its layers to an existing
    /// template, whose order the rows must match.
    pub fn read_layers_into(&self, template: &mut Template, reader: &mut dyn Read) -> Result<usize> {
        let rows = self.read_rows(reader, Some(template.order()))?;
        self.push_layers(template, rows)
    }

    fn read_rows(&self, reader: &mut dyn Read, order: Option<usize>) -> Result<Vec<Vec<u8>>> {
        let br = BufReader::new(reader);
        let mut rows: Vec<Vec<u8>> = Vec::new();
        for (i, line) in br.lines().enumerate() {
            let context = || format!("while reading line with index {}", i);
            let l = line.with_context(context)?;
            let l = l.trim();
            if l.is_empty() {
                continue;
            }
            let row = l
                .chars()
                .map(|c| match c.to_digit(10) {
                    Some(b) if b <= 1 => Ok(b as u8),
                    _ => Err(anyhow!(r#"template cells are bits, found "{}""#, c)),
                })
                .collect::<Result<Vec<u8>>>()
                .with_context(context)?;
            let expected = order.unwrap_or_else(|| rows.first().map_or(row.len(), Vec::len));
            if row.len() != expected {
                return Err(anyhow!(
                    "template row has width {} instead of {}",
                    row.len(),
                    expected
                ))
                .with_context(context);
            }
            rows.push(row);
        }
        Ok(rows)
    }

    fn push_layers(&self, template: &mut Template, rows: Vec<Vec<u8>>) -> Result<usize> {
        let order = template.order();
        if rows.len() % order != 0 {
            return Err(anyhow!(
                "{} template rows do not split into {}-row layers",
                rows.len(),
                order
            ));
        }
        let n_layers = rows.len() / order;
        let mut rows = rows.into_iter();
        for _ in 0..n_layers {
            template.push_layer((&mut rows).take(order).collect());
        }
        Ok(n_layers)
    }
}
