use std::collections::HashMap;

use chrono::NaiveDateTime;
use sqlx::types::Json;
use sqlx::{MySqlPool, Row};
use tracing::info;

use crate::legacy::models::{ContentRecord, FieldGroup, PersonFields};

/// Read-only access to the legacy content store.
#[derive(Debug, Clone)]
pub struct LegacyDb {
    pool: MySqlPool,
}

impl LegacyDb {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        info!("Connecting to legacy content store");
        let pool = MySqlPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Ids of post records eligible for migration: published after the
    /// site relaunch, on the main subsite, and not of the publication
    /// flavor handled elsewhere. Optional limit/offset allow batch runs.
    pub async fn fetch_post_ids(
        &self,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<i64>, sqlx::Error> {
        let mut sql = String::from(
            r#"
            select
              id
            from
              (
                select
                  c.id,
                  (
                    select
                      JSON_EXTRACT(ft.value, '$[0]')
                    from
                      bolt_field f
                      inner join bolt_field_translation ft on f.id=ft.translatable_id
                    where
                      f.content_id=c.id
                      and f.name='posttype'
                  ) posttype,
                  (
                    select
                      JSON_EXTRACT(ft.value, '$[0]')
                    from
                      bolt_field f
                      inner join bolt_field_translation ft on f.id=ft.translatable_id
                    where
                      f.content_id=c.id
                      and f.name='subsite'
                  ) subsite
                from
                  bolt_content c
                where
                  content_type='posts'
                  and published_at is not null
                  and published_at > '2018-09-01'
                order by
                  published_at desc
              ) content
            where
              (subsite is null or subsite='pro')
              and posttype <> 'Publication'
            "#,
        );

        if let Some(limit) = limit {
            sql.push_str(&format!("limit {}\n", limit));
        }
        if let Some(offset) = offset {
            sql.push_str(&format!("offset {}\n", offset));
        }

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(|row| row.get::<i64, _>("id")).collect())
    }

    /// Fetch one published record with its body decomposed into ordered
    /// field groups and its taxonomy slugs grouped by type.
    pub async fn fetch_content_record(
        &self,
        id: i64,
        content_type: &str,
    ) -> Result<Option<ContentRecord>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            select
              c.id content_id,
              c.title,
              c.published_at,
              (
                select JSON_ARRAYAGG(fields) from
                (
                  select
                    f.content_id content_id,
                    JSON_OBJECT(
                      'order', pf.sortorder,
                      'data', JSON_OBJECTAGG(f.name, JSON_EXTRACT(ft.value, '$'))
                    ) fields

                  from
                    bolt_field f
                    inner join bolt_field_translation ft on f.id=ft.translatable_id
                    left join bolt_field pf on f.parent_id=pf.id

                  where
                    c.id=f.content_id
                    and ft.value <> '[""]'

                  group by
                    pf.id

                  order by
                    pf.sortorder asc
                ) content_body
                group by content_id
              ) fields,
              (
                select JSON_OBJECTAGG(type, slugs) from
                (
                  select
                    c.id, t.type, JSON_ARRAYAGG(t.slug) slugs

                  from
                    bolt_taxonomy_content tc
                    inner join bolt_taxonomy t on tc.taxonomy_id=t.id

                  where
                    c.id=tc.content_id
                    and t.slug <> ''

                  group by c.id, t.type
                ) content_taxonomies
                group by id
              ) taxonomy

            from
              bolt_content c

            where
              c.content_type=?
              and c.published_at is not null
              and c.id=?
            "#,
        )
        .bind(content_type)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let fields: Option<Json<Vec<FieldGroup>>> = row.try_get("fields")?;
        let taxonomy: Option<Json<HashMap<String, Vec<String>>>> = row.try_get("taxonomy")?;

        Ok(Some(ContentRecord {
            id: row.get::<i64, _>("content_id"),
            title: row.try_get::<Option<String>, _>("title")?,
            published_at: row.try_get::<Option<NaiveDateTime>, _>("published_at")?,
            fields: fields.map(|json| json.0).unwrap_or_default(),
            taxonomy: taxonomy.map(|json| json.0).unwrap_or_default(),
        }))
    }

    /// Name and affiliation fields of one person record.
    pub async fn fetch_person_fields(
        &self,
        id: i64,
    ) -> Result<Option<PersonFields>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            select
              JSON_OBJECTAGG(f.name, JSON_EXTRACT(ft.value, '$[0]')) fields

            from
              bolt_content persons
              inner join bolt_field f on persons.id=f.content_id
              inner join bolt_field_translation ft on f.id=ft.translatable_id

            where
              persons.content_type='persons'
              and f.name in ('first_name', 'last_name', 'company')
              and persons.id=?

            group by
              persons.id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let fields: Option<Json<PersonFields>> = row.try_get("fields")?;
        Ok(fields.map(|json| json.0))
    }

    /// Every distinct author id referenced by any post, for the author
    /// migration's full run.
    pub async fn fetch_author_ids(&self) -> Result<Vec<i64>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            select
              distinct authors.author_id

            from
              bolt_content c
              inner join bolt_field f on c.id=f.content_id
              inner join bolt_field_translation ft on f.id=ft.translatable_id
              inner join JSON_TABLE(
                ft.value,
                '$[*]'
                COLUMNS(
                  author_id INT PATH '$'
                )
              ) authors

            where
              c.content_type='posts'
              and f.name='authors'
              and authors.author_id is not null

            order by
              authors.author_id asc
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| row.get::<i64, _>("author_id"))
            .collect())
    }
}
