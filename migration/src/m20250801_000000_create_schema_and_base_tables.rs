use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS meetnotes")
            .await?;

        // Create meeting_status enum
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE meetnotes.meeting_status AS ENUM (
                    'pending',
                    'completed'
                )",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TABLE meetnotes.users (
                    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                    email varchar(255) NOT NULL UNIQUE,
                    api_token varchar(255) NOT NULL UNIQUE,
                    calendar_access_token text,
                    created_at timestamptz NOT NULL DEFAULT now()
                )",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TABLE meetnotes.folders (
                    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                    name varchar(255) NOT NULL,
                    owner_id uuid NOT NULL REFERENCES meetnotes.users(id) ON DELETE CASCADE,
                    created_at timestamptz NOT NULL DEFAULT now()
                )",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TABLE meetnotes.meetings (
                    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                    title varchar(255) NOT NULL,
                    folder_id uuid REFERENCES meetnotes.folders(id) ON DELETE SET NULL,
                    owner_id uuid NOT NULL REFERENCES meetnotes.users(id) ON DELETE CASCADE,
                    status meetnotes.meeting_status NOT NULL DEFAULT 'completed',
                    transcript text NOT NULL DEFAULT '',
                    summary text,
                    audio_path varchar(255),
                    calendar_event_id varchar(255),
                    action_items text,
                    is_favorite boolean NOT NULL DEFAULT false,
                    start_time varchar(255),
                    end_time varchar(255),
                    created_at timestamptz NOT NULL DEFAULT now(),
                    updated_at timestamptz NOT NULL DEFAULT now()
                )",
            )
            .await?;

        // Listing and recent-context queries are always owner-scoped and
        // ordered by creation time descending.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX idx_meetings_owner_created_at
                 ON meetnotes.meetings (owner_id, created_at DESC)",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX idx_meetings_folder_id ON meetnotes.meetings (folder_id)",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX idx_folders_owner_id ON meetnotes.folders (owner_id)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS meetnotes.meetings")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS meetnotes.folders")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS meetnotes.users")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS meetnotes.meeting_status")
            .await?;

        Ok(())
    }
}
