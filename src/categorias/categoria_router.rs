// src/categorias/categoria_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::{query, query_as, Row};
use tracing::error;

// Importa as structs de categoria
use super::categoria_structs::{Categoria, NovaCategoria};
use crate::shared::erros::{self, ErroLoja};
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Rota para cadastrar uma nova categoria. Apenas administradores.
#[post("/categorias")]
pub async fn cadastrar_categoria(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    item: web::Json<NovaCategoria>,
) -> Result<HttpResponse, ErroLoja> {
    if !usuario.eh_admin() {
        return Err(ErroLoja::NaoAutorizado);
    }

    let result = query("INSERT INTO categorias (nome, parent_id) VALUES ($1, $2) RETURNING id")
        .bind(&item.nome)
        .bind(item.parent_id)
        .fetch_one(&data.db_pool)
        .await;

    match result {
        Ok(row) => {
            let id: i32 = row.try_get("id").map_err(ErroLoja::Banco)?;
            Ok(HttpResponse::Ok().json(GenericResponse::ok(
                format!("Categoria cadastrada com sucesso! ID: {}", id),
                serde_json::json!({ "id": id }),
            )))
        }
        Err(e) => {
            error!(erro = ?e, "erro ao inserir categoria");
            // parent_id inválido viola a foreign key
            if erros::violacao_de_fk(&e) {
                Ok(HttpResponse::BadRequest().json(GenericResponse::erro(
                    "parent_id inválido. Verifique o ID da categoria pai.",
                )))
            } else {
                Err(ErroLoja::Banco(e))
            }
        }
    }
}

/// Rota para listar todas as categorias.
#[get("/categorias")]
pub async fn buscar_categorias(data: web::Data<AppState>) -> Result<HttpResponse, ErroLoja> {
    let categorias = query_as::<_, Categoria>("SELECT id, nome, parent_id FROM categorias ORDER BY id")
        .fetch_all(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(categorias))
}

/// Rota para buscar uma categoria pelo seu ID.
#[get("/categorias/{id}")]
pub async fn buscar_categoria_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroLoja> {
    let id = path.into_inner();
    let categoria = query_as::<_, Categoria>("SELECT id, nome, parent_id FROM categorias WHERE id = $1")
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?;

    match categoria {
        Some(c) => Ok(HttpResponse::Ok().json(c)),
        None => Ok(HttpResponse::NotFound().json(GenericResponse::erro("Categoria não encontrada."))),
    }
}

/// Rota para atualizar uma categoria existente. Apenas administradores.
#[put("/categorias/{id}")]
pub async fn atualizar_categoria(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<NovaCategoria>,
) -> Result<HttpResponse, ErroLoja> {
    if !usuario.eh_admin() {
        return Err(ErroLoja::NaoAutorizado);
    }

    let id = path.into_inner();
    let result = query("UPDATE categorias SET nome = $1, parent_id = $2 WHERE id = $3")
        .bind(&item.nome)
        .bind(item.parent_id)
        .bind(id)
        .execute(&data.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(GenericResponse::erro("Categoria não encontrada.")));
    }

    Ok(HttpResponse::Ok().json(GenericResponse::ok(
        "Categoria atualizada com sucesso!",
        serde_json::json!({ "id": id }),
    )))
}

/// Rota para deletar uma categoria. Apenas administradores.
#[delete("/categorias/{id}")]
pub async fn deletar_categoria(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroLoja> {
    if !usuario.eh_admin() {
        return Err(ErroLoja::NaoAutorizado);
    }

    let id = path.into_inner();
    let result = query("DELETE FROM categorias WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(GenericResponse::erro("Categoria não encontrada.")));
    }

    Ok(HttpResponse::Ok().json(GenericResponse::ok(
        "Categoria removida com sucesso!",
        serde_json::json!({ "id": id }),
    )))
}
