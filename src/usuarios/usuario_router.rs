// src/usuarios/usuario_router.rs

use actix_web::{post, web, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST}; // Para hashing de senhas
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::{query, query_as, Row};
use tracing::error;

// Importa as structs do módulo de usuários
use super::usuario_structs::{AuthResponse, Claims, LoginRequest, NovoUsuario, Usuario};
// Importa GenericResponse do módulo shared_structs
use crate::shared::shared_structs::GenericResponse;
// Importa o AppState do módulo raiz
use crate::AppState;

/// Rota para cadastrar um novo usuário.
#[post("/usuarios/cadastro")]
pub async fn cadastrar_usuario(
    data: web::Data<AppState>,
    novo_usuario: web::Json<NovoUsuario>,
) -> HttpResponse {
    // 1. Verificar se o e-mail já está em uso
    let existing_user =
        query_as::<_, Usuario>("SELECT id, nome, email, senha_hash, papel FROM usuarios WHERE email = $1")
            .bind(&novo_usuario.email)
            .fetch_optional(&data.db_pool)
            .await;

    match existing_user {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest()
                .json(GenericResponse::erro("E-mail já cadastrado."));
        }
        Err(e) => {
            error!(erro = ?e, "erro ao verificar e-mail existente");
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao verificar e-mail."));
        }
        _ => {} // E-mail não encontrado, pode prosseguir
    }

    // 2. Hash da senha
    let hashed_password = match hash(&novo_usuario.senha, DEFAULT_COST) {
        Ok(h) => h,
        Err(e) => {
            error!(erro = ?e, "erro ao fazer hash da senha");
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao processar senha."));
        }
    };

    // 3. Inserir o novo usuário no banco de dados (todo cadastro nasce 'cliente')
    let result = query("INSERT INTO usuarios (nome, email, senha_hash) VALUES ($1, $2, $3) RETURNING id")
        .bind(&novo_usuario.nome)
        .bind(&novo_usuario.email)
        .bind(&hashed_password)
        .fetch_one(&data.db_pool)
        .await;

    match result {
        Ok(row) => match row.try_get::<i32, &str>("id") {
            Ok(id) => HttpResponse::Ok().json(GenericResponse::ok(
                "Usuário cadastrado com sucesso!",
                serde_json::json!({ "id": id }),
            )),
            Err(e) => {
                error!(erro = ?e, "erro ao obter id do novo usuário");
                HttpResponse::InternalServerError().json(GenericResponse::erro(
                    "Erro ao processar resposta do cadastro do usuário",
                ))
            }
        },
        Err(e) => {
            error!(erro = ?e, "erro ao inserir usuário");
            HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro ao cadastrar usuário."))
        }
    }
}

/// Rota para autenticar um usuário e emitir um token JWT.
#[post("/usuarios/login")]
pub async fn login_usuario(
    data: web::Data<AppState>,
    login: web::Json<LoginRequest>,
) -> HttpResponse {
    // 1. Buscar o usuário pelo e-mail
    let usuario_result =
        query_as::<_, Usuario>("SELECT id, nome, email, senha_hash, papel FROM usuarios WHERE email = $1")
            .bind(&login.email)
            .fetch_optional(&data.db_pool)
            .await;

    let usuario = match usuario_result {
        Ok(Some(u)) => u,
        Ok(None) => {
            return HttpResponse::Unauthorized()
                .json(GenericResponse::erro("E-mail ou senha inválidos."));
        }
        Err(e) => {
            error!(erro = ?e, "erro ao buscar usuário para login");
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao realizar login."));
        }
    };

    // 2. Verificar a senha contra o hash armazenado
    match verify(&login.senha, &usuario.senha_hash) {
        Ok(true) => {} // Senha correta, prossegue
        Ok(false) => {
            return HttpResponse::Unauthorized()
                .json(GenericResponse::erro("E-mail ou senha inválidos."));
        }
        Err(e) => {
            error!(erro = ?e, "erro ao verificar senha");
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao verificar senha."));
        }
    }

    // 3. Montar as claims com expiração de 24 horas
    let expiration = Utc::now() + Duration::hours(24);
    let claims = Claims {
        sub: usuario.id,
        name: usuario.nome.clone(),
        email: usuario.email.clone(),
        role: usuario.papel.clone(),
        exp: expiration.timestamp(),
    };

    // 4. Assinar o token com a chave secreta da aplicação
    let token = match encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(data.jwt_secret.as_ref()),
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(erro = ?e, "erro ao gerar token JWT");
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao gerar token."));
        }
    };

    HttpResponse::Ok().json(AuthResponse {
        status: "success".to_string(),
        message: "Login realizado com sucesso!".to_string(),
        user_id: usuario.id,
        user_name: usuario.nome,
        user_email: usuario.email,
        token,
    })
}
